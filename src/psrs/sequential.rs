/// Sequential building blocks for the parallel sort: Lomuto quicksort for
/// chunk-local runs and a sentinel-terminated mergesort for bucket finishes.
/// Both order records with `compare_records`.
use std::cmp::Ordering;
use std::mem;

use super::compare::compare_records;

/// In-place quicksort using the last element as pivot (Lomuto partition).
/// Textbook recursion, not randomized.
pub fn quicksort(records: &mut [Vec<u8>]) {
    if records.len() <= 1 {
        return;
    }
    let pivot = lomuto_partition(records);
    let (left, right) = records.split_at_mut(pivot);
    quicksort(left);
    quicksort(&mut right[1..]);
}

/// Partition around the last element and return its final position.
/// Elements that compare <= pivot end up left of it.
fn lomuto_partition(records: &mut [Vec<u8>]) -> usize {
    let hi = records.len() - 1;
    let mut store = 0;
    for probe in 0..hi {
        if compare_records(&records[probe], &records[hi]) != Ordering::Greater {
            records.swap(store, probe);
            store += 1;
        }
    }
    records.swap(store, hi);
    store
}

/// Build a sentinel that compares strictly greater than every record in
/// `records`: one 0xFF byte longer than the longest record. 0xFF is never
/// the separator, so the sentinel's key is the whole sentinel.
pub fn make_sentinel(records: &[Vec<u8>]) -> Vec<u8> {
    let max_len = records.iter().map(|r| r.len()).max().unwrap_or(0);
    vec![0xFF; max_len + 1]
}

/// In-place mergesort. `sentinel` must compare strictly greater than every
/// record in the slice; each run is terminated with it so the merge loop
/// needs no bounds checks.
pub fn mergesort(records: &mut [Vec<u8>], sentinel: &[u8]) {
    let n = records.len();
    if n <= 1 {
        return;
    }
    let mid = n.div_ceil(2);
    let (left, right) = records.split_at_mut(mid);
    mergesort(left, sentinel);
    mergesort(right, sentinel);
    merge(records, mid, sentinel);
}

/// Two-way merge of records[..mid] and records[mid..], both already sorted.
/// Ties emit the left run first, keeping the merge stable.
fn merge(records: &mut [Vec<u8>], mid: usize, sentinel: &[u8]) {
    let mut left: Vec<Vec<u8>> = records[..mid].iter_mut().map(mem::take).collect();
    let mut right: Vec<Vec<u8>> = records[mid..].iter_mut().map(mem::take).collect();
    left.push(sentinel.to_vec());
    right.push(sentinel.to_vec());

    let (mut li, mut ri) = (0, 0);
    for slot in records.iter_mut() {
        if compare_records(&left[li], &right[ri]) != Ordering::Greater {
            *slot = mem::take(&mut left[li]);
            li += 1;
        } else {
            *slot = mem::take(&mut right[ri]);
            ri += 1;
        }
    }
}
