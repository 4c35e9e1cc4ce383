pub mod batch;
pub mod pool;

pub use batch::{batch_ranges, evaluate_fits};
pub use pool::WorkerPool;
