use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Counting semaphore bounding how many chunk workers run at once.
///
/// `acquire` blocks while `capacity` permits are outstanding. Dropping a
/// [`Permit`] hands its slot back and wakes one waiter.
#[derive(Debug)]
pub struct AdmissionGate {
    capacity: usize,
    state: Mutex<GateState>,
    slot_freed: Condvar,
}

#[derive(Debug, Default)]
struct GateState {
    outstanding: usize,
    peak: usize,
}

/// A held admission slot. Released on drop, whatever path the holder takes.
#[derive(Debug)]
#[must_use = "dropping a permit releases its slot immediately"]
pub struct Permit<'a> {
    gate: &'a AdmissionGate,
}

impl AdmissionGate {
    /// Creates a gate with `capacity` slots. A capacity of zero is raised to 1
    /// so that `acquire` can always make progress.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(GateState::default()),
            slot_freed: Condvar::new(),
        }
    }

    pub fn acquire(&self) -> Permit<'_> {
        let state = self.lock();
        let mut state = self
            .slot_freed
            .wait_while(state, |s| s.outstanding >= self.capacity)
            .unwrap_or_else(PoisonError::into_inner);

        state.take_slot();
        Permit { gate: self }
    }

    /// Takes a slot only if one is free right now.
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        let mut state = self.lock();
        if state.outstanding >= self.capacity {
            return None;
        }

        state.take_slot();
        Some(Permit { gate: self })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn outstanding(&self) -> usize {
        self.lock().outstanding
    }

    /// Highest number of permits held at the same time since creation.
    pub fn peak(&self) -> usize {
        self.lock().peak
    }

    fn release(&self) {
        let mut state = self.lock();
        debug_assert!(state.outstanding > 0, "released more permits than acquired");
        state.outstanding = state.outstanding.saturating_sub(1);
        drop(state);

        self.slot_freed.notify_one();
    }

    // Nothing panics while holding this lock, so a poisoned state is still
    // consistent.
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GateState {
    fn take_slot(&mut self) {
        self.outstanding += 1;
        self.peak = self.peak.max(self.outstanding);
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
