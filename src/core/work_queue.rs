//! FIFO of pending paths shared by the workers

use crossbeam_channel::{unbounded, Receiver, TryRecvError};

/// Queue of paths filled once before the workers start.
///
/// The sending half is dropped as soon as the queue is filled, so an empty
/// queue is also a finished one: [`WorkQueue::try_next`] returns `None` and
/// never blocks. Every path is handed out exactly once.
#[derive(Debug, Clone)]
pub struct WorkQueue {
    rx: Receiver<String>,
}

impl WorkQueue {
    /// Build a queue holding `paths` in their original order
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (tx, rx) = unbounded();
        for path in paths {
            // The receiver is alive in this scope, so sending cannot fail
            let _ = tx.send(path.into());
        }
        Self { rx }
    }

    /// Take the next path, or `None` once the queue is drained
    pub fn try_next(&self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(path) => Some(path),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Number of paths still waiting
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
