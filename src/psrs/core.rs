/// Parallel Sorting by Regular Sampling over name records.
///
/// The sort runs as phases on the shared rayon pool:
/// 1. chunk + local quicksort + regular sampling (parallel)
/// 2. sample sort + pivot selection (sequential)
/// 3. per-chunk pivot boundary search (parallel)
/// 4. bucket size aggregation + prefix-sum offsets (sequential)
/// 5. per-bucket gather + mergesort into disjoint output regions (parallel)
///
/// Each `collect()` between phases is a barrier: the sequential steps read
/// structures (sample buffer, boundary tables, bucket plan) that are only
/// complete once every worker has joined. Within a phase, workers own
/// their data outright — chunks, sample vectors, and boundary rows are
/// returned from `map`, and output regions are carved with `split_at_mut`
/// — so no phase shares mutable state.
use std::cmp::Ordering;
use std::mem;

use rayon::prelude::*;

use super::compare::compare_records;
use super::sequential::{make_sentinel, mergesort, quicksort};

/// Configuration for one sort invocation.
#[derive(Debug, Clone)]
pub struct PsrsConfig {
    /// Number of logical workers (chunks). Clamped to the record count so
    /// every chunk holds at least one record.
    pub workers: usize,
    /// Merge sentinel; must compare strictly greater than every record.
    /// None derives one from the input.
    pub sentinel: Option<Vec<u8>>,
}

impl Default for PsrsConfig {
    fn default() -> Self {
        PsrsConfig {
            workers: 1,
            sentinel: None,
        }
    }
}

/// Per-bucket sizes and output offsets aggregated from all boundary tables.
#[derive(Debug)]
pub struct BucketPlan {
    pub sizes: Vec<usize>,
    pub offsets: Vec<usize>,
}

/// Sort records in place with the configured worker count.
pub fn psrs_sort(records: &mut [Vec<u8>], config: &PsrsConfig) {
    let n = records.len();
    if n == 0 {
        return;
    }

    let workers = config.workers.clamp(1, n);
    let sentinel = match &config.sentinel {
        Some(s) => s.clone(),
        None => make_sentinel(records),
    };

    // Phase 1: move records into per-worker chunks, sort each chunk
    // locally, draw a regular sample from each.
    let chunk_size = n.div_ceil(workers);
    let mut chunks: Vec<Vec<Vec<u8>>> = records
        .chunks_mut(chunk_size)
        .map(|chunk| chunk.iter_mut().map(mem::take).collect())
        .collect();
    // Ceil division can produce fewer than `workers` chunks (n=5 with 4
    // workers gives 2,2,1); the chunk count is the worker count from here.
    let workers = chunks.len();

    let samples: Vec<Vec<Vec<u8>>> = chunks
        .par_iter_mut()
        .map(|chunk| {
            quicksort(chunk);
            draw_regular_sample(chunk, workers)
        })
        .collect();

    // Phase 2 (sequential): sort the gathered sample, pick global pivots.
    let mut sample_buf: Vec<Vec<u8>> = samples.into_iter().flatten().collect();
    quicksort(&mut sample_buf);
    let pivots = select_pivots(&sample_buf, workers);

    // Phase 3: each worker locates every pivot inside its sorted chunk.
    let boundaries: Vec<Vec<usize>> = chunks
        .par_iter()
        .map(|chunk| locate_boundaries(chunk, &pivots))
        .collect();

    // Phase 4 (sequential): bucket sizes and output offsets.
    let plan = plan_buckets(&boundaries, n);

    // Phase 5: gather each bucket from all chunks and merge it. The output
    // regions are disjoint and cover the whole array, so the merges run
    // fully in parallel.
    let mut output: Vec<Vec<u8>> = vec![Vec::new(); n];
    let mut regions: Vec<&mut [Vec<u8>]> = Vec::with_capacity(workers);
    let mut rest = output.as_mut_slice();
    for (&size, &offset) in plan.sizes.iter().zip(&plan.offsets) {
        debug_assert_eq!(n - rest.len(), offset);
        let (region, tail) = rest.split_at_mut(size);
        regions.push(region);
        rest = tail;
    }

    regions
        .into_par_iter()
        .enumerate()
        .for_each(|(bucket, region)| {
            let mut cursor = 0;
            for (chunk, bounds) in chunks.iter().zip(&boundaries) {
                for record in &chunk[bounds[bucket]..bounds[bucket + 1]] {
                    region[cursor] = record.clone();
                    cursor += 1;
                }
            }
            debug_assert_eq!(cursor, region.len());
            mergesort(region, &sentinel);
        });

    for (slot, sorted) in records.iter_mut().zip(output) {
        *slot = sorted;
    }
}

/// Draw workers-1 records from a sorted chunk at evenly spaced ranks.
/// Ranks past the end of a short chunk clamp to its last record.
fn draw_regular_sample(chunk: &[Vec<u8>], workers: usize) -> Vec<Vec<u8>> {
    let step = chunk.len().div_ceil(workers);
    (1..workers)
        .map(|j| chunk[(j * step).min(chunk.len() - 1)].clone())
        .collect()
}

/// Pick workers-1 pivots from the sorted sample buffer, one candidate out
/// of every stride of `workers` ranks so each chunk contributes
/// proportionally.
fn select_pivots(sample: &[Vec<u8>], workers: usize) -> Vec<Vec<u8>> {
    (0..workers.saturating_sub(1))
        .map(|i| sample[i * workers + workers / 2].clone())
        .collect()
}

/// Boundary table for one sorted chunk: workers+1 monotone indices where
/// bounds[0] = 0, bounds[workers] = chunk length, and bounds[p+1] is the
/// insertion point of pivot p. Pivots resolve middle-first so each search
/// runs over an already narrowed sub-range instead of the whole chunk.
pub fn locate_boundaries(chunk: &[Vec<u8>], pivots: &[Vec<u8>]) -> Vec<usize> {
    let workers = pivots.len() + 1;
    let mut bounds = vec![0usize; workers + 1];
    bounds[workers] = chunk.len();
    if !pivots.is_empty() {
        fill_boundaries(chunk, pivots, &mut bounds, 0, pivots.len() - 1, 0, chunk.len());
    }
    debug_assert!(bounds.windows(2).all(|pair| pair[0] <= pair[1]));
    bounds
}

/// Resolve pivots[first..=last] against chunk[lo..hi): place the middle
/// pivot's boundary, then recurse left of it below and right of it above.
fn fill_boundaries(
    chunk: &[Vec<u8>],
    pivots: &[Vec<u8>],
    bounds: &mut [usize],
    first: usize,
    last: usize,
    lo: usize,
    hi: usize,
) {
    let mid = (first + last) / 2;
    let split = lo + insertion_point(&chunk[lo..hi], &pivots[mid]);
    bounds[mid + 1] = split;
    if mid > first {
        fill_boundaries(chunk, pivots, bounds, first, mid - 1, lo, split);
    }
    if mid < last {
        fill_boundaries(chunk, pivots, bounds, mid + 1, last, split, hi);
    }
}

/// First index in a sorted run whose record compares greater than the
/// pivot: probe greater moves the upper bound down, anything else moves
/// the lower bound up, and the resting lower bound is the insertion point.
fn insertion_point(run: &[Vec<u8>], pivot: &[u8]) -> usize {
    let (mut lo, mut hi) = (0, run.len());
    while lo < hi {
        let mid = (lo + hi) / 2;
        if compare_records(&run[mid], pivot) == Ordering::Greater {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Aggregate boundary deltas into bucket sizes, then prefix-sum them into
/// output offsets. The sizes must account for every record; a mismatch
/// means the boundary computation itself is broken, so this asserts
/// instead of recovering.
pub fn plan_buckets(boundaries: &[Vec<usize>], n: usize) -> BucketPlan {
    let workers = boundaries[0].len() - 1;

    let mut sizes = vec![0usize; workers];
    for bounds in boundaries {
        for bucket in 0..workers {
            sizes[bucket] += bounds[bucket + 1] - bounds[bucket];
        }
    }

    let mut offsets = vec![0usize; workers];
    for bucket in 1..workers {
        offsets[bucket] = offsets[bucket - 1] + sizes[bucket - 1];
    }

    assert_eq!(
        sizes.iter().sum::<usize>(),
        n,
        "bucket sizes must cover every record"
    );

    BucketPlan { sizes, offsets }
}
