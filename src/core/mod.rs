//! Concurrent batch validation engine

pub mod aggregator;
pub mod progress;
pub mod validator;
pub mod work_queue;
pub mod worker_pool;

pub use aggregator::{BatchOutcome, ResultAggregator};
pub use progress::{BarReporter, NoOpReporter, ProgressReporter};
pub use validator::{validate_file, CheckError, ValidationResult};
pub use work_queue::WorkQueue;
pub use worker_pool::{run_batch, WorkerPool};
