//! Officer approval counters
//!
//! The tracker never owns global state; it talks to a `CounterStore`.
//! Swapping the in-memory table for a database or a distributed counter
//! does not change the tracker.

use dashmap::DashMap;
use std::sync::Arc;

/// Key-value counter backing the approval tracker
pub trait CounterStore: Send + Sync {
    /// Current count for `key` (0 if never seen)
    fn get(&self, key: &str) -> u64;

    /// Atomically add one and return the new count.
    ///
    /// Concurrent increments of the same key must not interleave their
    /// read-modify-write, or approvals get undercounted.
    fn increment(&self, key: &str) -> u64;
}

impl<T: CounterStore + ?Sized> CounterStore for Arc<T> {
    fn get(&self, key: &str) -> u64 {
        (**self).get(key)
    }

    fn increment(&self, key: &str) -> u64 {
        (**self).increment(key)
    }
}

/// Thread-safe in-memory counter table
#[derive(Clone, Default)]
pub struct InMemoryCounterStore {
    counts: Arc<DashMap<String, u64>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl CounterStore for InMemoryCounterStore {
    fn get(&self, key: &str) -> u64 {
        self.counts.get(key).map(|c| *c).unwrap_or(0)
    }

    fn increment(&self, key: &str) -> u64 {
        // the entry guard holds the shard lock for the whole update
        let mut count = self.counts.entry(key.to_string()).or_insert(0);
        *count += 1;
        *count
    }
}
