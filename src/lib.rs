#![allow(clippy::needless_range_loop, clippy::too_many_arguments)]

/// Use mimalloc as the global allocator.
/// Sorting owned record-per-line buffers means many small allocations;
/// mimalloc's thread-local caching handles that pattern far better than
/// glibc malloc.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod common;
pub mod psrs;
