//! Approval threshold tracking
//!
//! Per-officer approval counting, independent of risk scoring.

mod store;
mod tracker;

pub use store::{CounterStore, InMemoryCounterStore};
pub use tracker::{ApprovalStatus, ApprovalThresholdTracker};
