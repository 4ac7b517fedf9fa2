//! Idle/Running gate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether a regeneration cycle is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Admits at most one cycle at a time.
#[derive(Debug, Default)]
pub struct RunGate {
    running: AtomicBool,
}

impl RunGate {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// ## Summary
    /// Moves the gate from Idle to Running.
    ///
    /// Returns `None` if a cycle is already running. The gate returns to Idle
    /// when the guard is dropped, including while unwinding from a panic.
    #[must_use]
    pub fn try_enter(self: &Arc<Self>) -> Option<RunGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard {
                gate: Arc::clone(self),
            })
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        if self.running.load(Ordering::Acquire) {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }
}

/// Holds the gate in the Running state.
#[derive(Debug)]
pub struct RunGuard {
    gate: Arc<RunGate>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.gate.running.store(false, Ordering::Release);
    }
}
