//! Transaction history
//!
//! An append-only log of scored transactions. Scoring always runs against
//! an immutable [`HistorySnapshot`]; appends are version-checked so a
//! result computed against a stale snapshot is never silently recorded.
//!
//! The log starts with the seed corpus (see [`seed_history`]) followed by
//! entries accumulated during the session, optionally persisted as JSONL
//! through [`SessionStore`].

mod log;
mod seed;
mod store;

pub use self::log::{HistoryLog, HistorySnapshot};
pub use seed::{seed_history, seed_history_at, seed_reference_time};
pub use store::SessionStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History changed during scoring: expected version {expected}, found {actual}")]
    VersionConflict { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize history entry: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type HistoryResult<T> = Result<T, HistoryError>;
