//! Batch distribution for parallel fit evaluation.
//!
//! Each request builds its own context, so the runner is a plain
//! data-parallel map. `batch_ranges` carves a request list into
//! near-equal contiguous chunks for callers that report progress per
//! chunk instead of per fit.

use rayon::prelude::*;

use crate::eval::{evaluate, EvalReport, EvalRequest};
use crate::parallel::pool::WorkerPool;

/// Carve `total` items into at most `chunks` contiguous ranges
/// `[start, end)`. Boundaries sit on the rounded multiples of
/// `total / chunks`, so range sizes differ by at most one.
pub fn batch_ranges(total: usize, chunks: usize) -> Vec<(usize, usize)> {
    if total == 0 || chunks == 0 {
        return Vec::new();
    }
    let chunks = chunks.min(total);
    (0..chunks)
        .map(|i| (i * total / chunks, (i + 1) * total / chunks))
        .collect()
}

/// Evaluate many fit requests in parallel, preserving input order.
pub fn evaluate_fits(requests: &[EvalRequest], pool: &WorkerPool) -> Vec<EvalReport> {
    pool.run(|| requests.par_iter().map(evaluate).collect())
}
