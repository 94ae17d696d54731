use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Counts dispatched-but-unfinished workers. `wait` returns once the count
/// is back to zero.
#[derive(Debug, Default)]
pub struct CompletionBarrier {
    pending: Mutex<usize>,
    drained: Condvar,
}

/// Registration handle for one worker. Dropping it signals completion
/// exactly once.
#[derive(Debug)]
#[must_use = "dropping a signal marks the worker as finished"]
pub struct Signal<'a> {
    barrier: &'a CompletionBarrier,
}

impl CompletionBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> Signal<'_> {
        *self.lock() += 1;
        Signal { barrier: self }
    }

    pub fn pending(&self) -> usize {
        *self.lock()
    }

    pub fn wait(&self) {
        let pending = self.lock();
        let _drained = self
            .drained
            .wait_while(pending, |n| *n > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    fn done(&self) {
        let mut pending = self.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.drained.notify_all();
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Signal<'_> {
    fn drop(&mut self) {
        self.barrier.done();
    }
}
