//! Batch scheduler.
//!
//! Turns a URL list into transfer tasks and runs them concurrently, with at
//! most `capacity` transfers between admission and their terminal state.

mod batch;
mod gate;
mod report;

pub use batch::{plan_batch, run_batch};
pub use gate::{ConcurrencyGate, GateClosed, GatePermit};
pub use report::{BatchReport, OutcomeRecord};
