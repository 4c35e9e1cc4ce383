//! Thread pool selection for batch evaluation workloads.
//!
//! Contexts are single-owner and share only the read-only catalogue, so a
//! batch of fits parallelizes without coordination; the only knob is how
//! many threads to spend on it. A dedicated pool is built once and held
//! for its lifetime instead of being rebuilt on every batch.

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

pub struct WorkerPool {
    /// None means the global Rayon pool.
    pool: Option<ThreadPool>,
}

impl WorkerPool {
    /// Evaluate on the global Rayon pool (all cores).
    pub fn shared() -> Self {
        WorkerPool { pool: None }
    }

    /// Build a pool pinned to `workers` threads and reuse it for every
    /// batch run through it. Zero workers falls back to the shared pool.
    pub fn dedicated(workers: usize) -> Result<Self, ThreadPoolBuildError> {
        if workers == 0 {
            return Ok(Self::shared());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|n| format!("dogma-eval-{n}"))
            .build()?;
        Ok(WorkerPool { pool: Some(pool) })
    }

    /// Run `work` inside this pool; rayon iterators in `work` pick the
    /// pool up implicitly.
    pub fn run<F, R>(&self, work: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::shared()
    }
}
