use std::cmp::Ordering;

use proptest::prelude::*;

use super::compare::*;
use super::core::*;
use super::sequential::*;

fn records(names: &[&str]) -> Vec<Vec<u8>> {
    names.iter().map(|n| n.as_bytes().to_vec()).collect()
}

fn as_strings(records: &[Vec<u8>]) -> Vec<String> {
    records
        .iter()
        .map(|r| String::from_utf8(r.clone()).unwrap())
        .collect()
}

fn sort_with(names: &[&str], workers: usize) -> Vec<String> {
    let mut recs = records(names);
    psrs_sort(
        &mut recs,
        &PsrsConfig {
            workers,
            sentinel: None,
        },
    );
    as_strings(&recs)
}

#[test]
fn test_last_name_extraction() {
    assert_eq!(last_name(b"Amy Smith"), b"Smith");
    assert_eq!(last_name(b"Anne Marie Jones"), b"Marie Jones");
}

#[test]
fn test_last_name_no_separator() {
    assert_eq!(last_name(b"Zeta"), b"Zeta");
    assert_eq!(last_name(b""), b"");
}

#[test]
fn test_compare_by_last_name() {
    assert_eq!(compare_records(b"Bob Smith", b"Amy Young"), Ordering::Less);
    assert_eq!(compare_records(b"Zoe Adams", b"Amy Young"), Ordering::Less);
    assert_eq!(compare_records(b"Amy Smith", b"Amy Smith"), Ordering::Equal);
}

#[test]
fn test_compare_tie_break_on_first_name() {
    assert_eq!(compare_records(b"Amy Smith", b"Bob Smith"), Ordering::Less);
    assert_eq!(compare_records(b"Bob Smith", b"Amy Smith"), Ordering::Greater);
}

#[test]
fn test_quicksort_basic() {
    let mut recs = records(&["Carl Young", "Amy Smith", "Bob Adams"]);
    quicksort(&mut recs);
    assert_eq!(as_strings(&recs), vec!["Bob Adams", "Amy Smith", "Carl Young"]);
}

#[test]
fn test_quicksort_presorted_and_reversed() {
    let sorted = records(&["Bob Adams", "Amy Smith", "Carl Young"]);

    let mut recs = sorted.clone();
    quicksort(&mut recs);
    assert_eq!(recs, sorted);

    let mut recs: Vec<Vec<u8>> = sorted.iter().rev().cloned().collect();
    quicksort(&mut recs);
    assert_eq!(recs, sorted);
}

#[test]
fn test_quicksort_duplicates() {
    let mut recs = records(&["Amy Smith", "Bob Adams", "Amy Smith", "Bob Adams"]);
    quicksort(&mut recs);
    assert_eq!(
        as_strings(&recs),
        vec!["Bob Adams", "Bob Adams", "Amy Smith", "Amy Smith"]
    );
}

#[test]
fn test_mergesort_basic() {
    let mut recs = records(&["Carl Young", "Amy Smith", "Bob Adams", "Dan Brown"]);
    let sentinel = make_sentinel(&recs);
    mergesort(&mut recs, &sentinel);
    assert_eq!(
        as_strings(&recs),
        vec!["Bob Adams", "Dan Brown", "Amy Smith", "Carl Young"]
    );
}

#[test]
fn test_sentinel_tops_every_record() {
    let recs = vec![vec![0xFF; 8], b"Zz Zz".to_vec(), b"".to_vec()];
    let sentinel = make_sentinel(&recs);
    for r in &recs {
        assert_eq!(compare_records(&sentinel, r), Ordering::Greater);
    }
}

#[test]
fn test_sort_empty() {
    for workers in [1, 4, 9] {
        assert!(sort_with(&[], workers).is_empty());
    }
}

#[test]
fn test_sort_single_record_any_worker_count() {
    for workers in 1..10 {
        assert_eq!(sort_with(&["Amy Smith"], workers), vec!["Amy Smith"]);
    }
}

#[test]
fn test_sort_more_workers_than_records() {
    assert_eq!(
        sort_with(&["Carl Young", "Amy Smith", "Bob Adams"], 8),
        vec!["Bob Adams", "Amy Smith", "Carl Young"]
    );
}

#[test]
fn test_sort_tie_break() {
    assert_eq!(
        sort_with(&["Bob Smith", "Amy Smith"], 2),
        vec!["Amy Smith", "Bob Smith"]
    );
}

#[test]
fn test_sort_no_separator_fallback() {
    assert_eq!(
        sort_with(&["Zeta", "Amy Smith"], 2),
        vec!["Amy Smith", "Zeta"]
    );
}

#[test]
fn test_sort_empty_records_come_first() {
    assert_eq!(
        sort_with(&["Amy Smith", "", "Zeta"], 3),
        vec!["", "Amy Smith", "Zeta"]
    );
}

#[test]
fn test_sort_worker_count_invariance() {
    let names = [
        "Gail Hall", "Amy Smith", "Bob Smith", "Zeta", "Carl Young", "Dan Brown", "Eve Adams",
        "Fay Brown", "Amy Smith", "Hal Ives",
    ];
    let reference = sort_with(&names, 1);
    for workers in [2, 7, 16] {
        assert_eq!(sort_with(&names, workers), reference);
    }
}

#[test]
fn test_sort_idempotence() {
    let names = ["Eve Adams", "Dan Brown", "Amy Smith", "Carl Young"];
    let once = sort_with(&names, 4);
    let once_refs: Vec<&str> = once.iter().map(|s| s.as_str()).collect();
    assert_eq!(sort_with(&once_refs, 4), once);
}

#[test]
fn test_locate_boundaries_no_pivots() {
    let chunk = records(&["Bob Adams", "Amy Smith"]);
    assert_eq!(locate_boundaries(&chunk, &[]), vec![0, 2]);
}

#[test]
fn test_locate_boundaries_partitions_chunk() {
    let mut chunk = records(&[
        "Eve Adams", "Dan Brown", "Fay Brown", "Amy Smith", "Bob Smith", "Carl Young",
    ]);
    quicksort(&mut chunk);
    let pivots = records(&["Fay Brown", "Bob Smith"]);

    let bounds = locate_boundaries(&chunk, &pivots);
    assert_eq!(bounds.len(), 4);
    assert_eq!(bounds[0], 0);
    assert_eq!(bounds[3], chunk.len());

    for (p, pivot) in pivots.iter().enumerate() {
        let split = bounds[p + 1];
        for record in &chunk[..split] {
            assert_ne!(compare_records(record, pivot), Ordering::Greater);
        }
        for record in &chunk[split..] {
            assert_eq!(compare_records(record, pivot), Ordering::Greater);
        }
    }
}

#[test]
fn test_plan_buckets_aggregates_and_prefix_sums() {
    let boundaries = vec![vec![0, 1, 3], vec![0, 2, 2]];
    let plan = plan_buckets(&boundaries, 5);
    assert_eq!(plan.sizes, vec![3, 2]);
    assert_eq!(plan.offsets, vec![0, 3]);
}

#[test]
#[should_panic(expected = "bucket sizes must cover every record")]
fn test_plan_buckets_detects_lost_records() {
    let boundaries = vec![vec![0, 1, 3]];
    plan_buckets(&boundaries, 4);
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[A-E][a-z]{0,4} [A-E][a-z]{0,4}",
        1 => "[A-E][a-z]{0,6}",
    ]
}

proptest! {
    #[test]
    fn prop_sorts_and_preserves_records(
        names in prop::collection::vec(name_strategy(), 0..80),
        workers in 1usize..12,
    ) {
        let mut recs: Vec<Vec<u8>> = names.iter().map(|n| n.as_bytes().to_vec()).collect();
        let mut expected = recs.clone();
        psrs_sort(&mut recs, &PsrsConfig { workers, sentinel: None });

        for pair in recs.windows(2) {
            prop_assert_ne!(compare_records(&pair[0], &pair[1]), Ordering::Greater);
        }

        // Same multiset of records in and out.
        expected.sort();
        let mut actual = recs.clone();
        actual.sort();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_worker_count_invariance(
        names in prop::collection::vec(name_strategy(), 0..60),
        workers in 2usize..10,
    ) {
        let mut sequential: Vec<Vec<u8>> = names.iter().map(|n| n.as_bytes().to_vec()).collect();
        let mut parallel = sequential.clone();
        psrs_sort(&mut sequential, &PsrsConfig { workers: 1, sentinel: None });
        psrs_sort(&mut parallel, &PsrsConfig { workers, sentinel: None });
        prop_assert_eq!(sequential, parallel);
    }

    #[test]
    fn prop_boundaries_monotone_and_conserving(
        names in prop::collection::vec(name_strategy(), 1..50),
        pivot_names in prop::collection::vec(name_strategy(), 0..7),
    ) {
        let mut chunk: Vec<Vec<u8>> = names.iter().map(|n| n.as_bytes().to_vec()).collect();
        quicksort(&mut chunk);
        let mut pivots: Vec<Vec<u8>> = pivot_names.iter().map(|n| n.as_bytes().to_vec()).collect();
        quicksort(&mut pivots);

        let bounds = locate_boundaries(&chunk, &pivots);
        prop_assert_eq!(bounds.len(), pivots.len() + 2);
        prop_assert_eq!(bounds[0], 0);
        prop_assert_eq!(*bounds.last().unwrap(), chunk.len());
        for pair in bounds.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }

        // Boundary deltas cover the whole chunk exactly.
        let total: usize = bounds.windows(2).map(|pair| pair[1] - pair[0]).sum();
        prop_assert_eq!(total, chunk.len());
    }
}
