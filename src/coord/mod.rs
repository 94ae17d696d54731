//! Synchronization primitives shared between the orchestrator and its workers.
//!
//! Both are per-invocation objects: the orchestrator creates them, lends them
//! to the workers it spawns and drops them once the read has drained.

mod admission;
mod barrier;

pub use admission::{AdmissionGate, Permit};
pub use barrier::{CompletionBarrier, Signal};
