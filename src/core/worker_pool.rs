//! Fixed-size pool of validation workers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::aggregator::{BatchOutcome, ResultAggregator};
use super::progress::{NoOpReporter, ProgressReporter};
use super::validator::validate_file;
use super::work_queue::WorkQueue;

/// Runs batches of file checks on a fixed number of worker threads.
///
/// The pool owns no mutable state of its own; each call to [`WorkerPool::run`]
/// builds a fresh queue and aggregator.
pub struct WorkerPool {
    workers: usize,
    reporter: Arc<dyn ProgressReporter>,
    cancel: Option<Arc<AtomicBool>>,
}

impl WorkerPool {
    /// Create a pool that runs at most `workers` threads (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            reporter: Arc::new(NoOpReporter),
            cancel: None,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Stop handing out new files once `flag` becomes true.
    ///
    /// Workers check the flag between files, never in the middle of one.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Validate every path and block until all workers are done
    ///
    /// # Arguments
    /// * `paths` - Paths to check, each exactly once
    ///
    /// # Returns
    /// Results in completion order and the elapsed wall-clock time
    pub fn run(&self, paths: &[String]) -> BatchOutcome {
        if paths.is_empty() {
            return BatchOutcome::empty();
        }

        let worker_count = self.workers.min(paths.len());
        let queue = WorkQueue::new(paths.iter().cloned());
        let aggregator = ResultAggregator::new(paths.len());

        log::info!(
            "Checking {} file(s) with {} worker(s)",
            paths.len(),
            worker_count
        );
        self.reporter.on_start(paths.len());

        match rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("file-check-{}", i))
            .build()
        {
            Ok(pool) => pool.scope(|scope| {
                for _ in 0..worker_count {
                    scope.spawn(|_| self.drain(&queue, &aggregator));
                }
            }),
            Err(e) => {
                log::warn!("Failed to build worker pool ({}), checking on the calling thread", e);
                self.drain(&queue, &aggregator);
            }
        }

        self.reporter.on_finish();
        if !queue.is_empty() {
            log::warn!(
                "Cancelled after {} of {} file(s), {} left unchecked",
                aggregator.processed(),
                aggregator.total(),
                queue.len()
            );
        }
        let outcome = aggregator.finish();
        log::info!(
            "Checked {}/{} file(s) in {:.2}s",
            outcome.results.len(),
            outcome.total,
            outcome.elapsed_secs()
        );
        outcome
    }

    fn drain(&self, queue: &WorkQueue, aggregator: &ResultAggregator) {
        while !self.is_cancelled() {
            let Some(path) = queue.try_next() else {
                break;
            };

            let result = validate_file(&path);
            if let Some(error) = &result.error {
                log::debug!("{}: {}", path, error);
            }

            let processed = aggregator.record(result.clone());
            self.reporter
                .on_result(processed, aggregator.total(), &result);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

/// Validate `paths` on `worker_count` threads without progress output
pub fn run_batch(paths: &[String], worker_count: usize) -> BatchOutcome {
    WorkerPool::new(worker_count).run(paths)
}
