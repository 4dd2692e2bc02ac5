//! Thread-safe collection of batch results

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::validator::ValidationResult;

#[derive(Debug, Default)]
struct BatchState {
    results: Vec<ValidationResult>,
    processed: usize,
}

/// Collects per-file results for one batch.
///
/// The append and the counter increment happen under one lock, so the
/// processed count always equals the number of stored results.
#[derive(Debug)]
pub struct ResultAggregator {
    total: usize,
    started: Instant,
    state: Mutex<BatchState>,
}

/// Finished batch: results in completion order plus wall-clock time
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: Vec<ValidationResult>,
    pub total: usize,
    pub elapsed: Duration,
    /// True when the batch stopped before the queue was drained
    pub interrupted: bool,
}

impl BatchOutcome {
    /// Outcome of a batch with nothing to do
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            elapsed: Duration::ZERO,
            interrupted: false,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn good_count(&self) -> usize {
        self.results.iter().filter(|r| r.readable).count()
    }

    pub fn bad_count(&self) -> usize {
        self.results.len() - self.good_count()
    }
}

impl ResultAggregator {
    /// Start a batch of `total` items; the clock starts now
    pub fn new(total: usize) -> Self {
        Self {
            total,
            started: Instant::now(),
            state: Mutex::new(BatchState {
                results: Vec::with_capacity(total),
                processed: 0,
            }),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Store one result and return the new processed count
    pub fn record(&self, result: ValidationResult) -> usize {
        let mut state = self.lock();
        state.results.push(result);
        state.processed += 1;
        state.processed
    }

    pub fn processed(&self) -> usize {
        self.lock().processed
    }

    /// Close the batch and hand back everything recorded so far
    pub fn finish(self) -> BatchOutcome {
        let elapsed = self.started.elapsed();
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        BatchOutcome {
            interrupted: state.processed < self.total,
            results: state.results,
            total: self.total,
            elapsed,
        }
    }

    // A worker panicking mid-record cannot leave the pair half-updated,
    // so a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, BatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
