//! Regeneration cycles and their scheduling.
//!
//! - Cycle: one full pass over every category with events
//! - Gate: the Idle/Running state that keeps cycles from overlapping
//! - Scheduler: fires a cycle on a fixed interval through the gate

mod cycle;
mod gate;
mod scheduler;

pub use cycle::{CycleReport, run_cycle};
pub use gate::{RunGate, RunGuard, SchedulerState};
pub use scheduler::{Regenerator, TickOutcome};
