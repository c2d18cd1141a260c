//! Append-only, versioned history log

use crate::history::{HistoryError, HistoryResult};
use crate::models::HistoryEntry;
use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Frozen view of the log at one version.
///
/// Cheap to clone. Later appends never show up in an existing snapshot.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    entries: Arc<Vec<HistoryEntry>>,
    seed_len: usize,
}

impl HistorySnapshot {
    /// Version is the entry count at capture time
    pub fn version(&self) -> usize {
        self.entries.len()
    }

    pub fn as_slice(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries appended after the seed corpus
    pub fn session_entries(&self) -> &[HistoryEntry] {
        &self.entries[self.seed_len.min(self.entries.len())..]
    }
}

impl Deref for HistorySnapshot {
    type Target = [HistoryEntry];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

/// Shared append-only history.
///
/// Writers swap in a new `Arc` only when a snapshot is still held
/// elsewhere; otherwise the vector is extended in place.
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: RwLock<Arc<Vec<HistoryEntry>>>,
    seed_len: usize,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log pre-populated with seed entries
    pub fn with_seed(seed: Vec<HistoryEntry>) -> Self {
        let seed_len = seed.len();
        Self {
            entries: RwLock::new(Arc::new(seed)),
            seed_len,
        }
    }

    pub fn seed_len(&self) -> usize {
        self.seed_len
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        HistorySnapshot {
            entries: Arc::clone(&entries),
            seed_len: self.seed_len,
        }
    }

    pub fn version(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Append only if nothing was appended since `expected_version`.
    ///
    /// The check and the push happen under one write lock, so two racing
    /// writers that scored against the same snapshot cannot both succeed.
    pub fn append_at(&self, expected_version: usize, entry: HistoryEntry) -> HistoryResult<usize> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let actual = entries.len();
        if actual != expected_version {
            warn!(
                "Rejected append of {}: history moved from version {} to {}",
                entry.id, expected_version, actual
            );
            return Err(HistoryError::VersionConflict {
                expected: expected_version,
                actual,
            });
        }

        debug!("Appending history entry {} at version {}", entry.id, actual);
        Arc::make_mut(&mut *entries).push(entry);
        Ok(actual + 1)
    }

    /// Append previously recorded session entries (restore path)
    pub fn extend(&self, restored: impl IntoIterator<Item = HistoryEntry>) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut *entries).extend(restored);
        entries.len()
    }

    /// Look up an entry by id, ignoring case and surrounding whitespace
    pub fn find(&self, id: &str) -> Option<HistoryEntry> {
        let needle = id.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.snapshot()
            .iter()
            .find(|h| h.id.trim().to_lowercase() == needle)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, RiskAnalysisResult, TransactionRecord};

    fn entry(id: &str) -> HistoryEntry {
        HistoryEntry::new(
            TransactionRecord::new(Category::Tenders, "VEN-1", "Vendor", 1.0),
            RiskAnalysisResult::baseline(0),
            None,
        )
        .with_id(id)
    }

    #[test]
    fn test_snapshot_is_frozen() {
        let log = HistoryLog::with_seed(vec![entry("SEED-1")]);
        let before = log.snapshot();
        log.append_at(before.version(), entry("REP-1")).unwrap();

        assert_eq!(before.version(), 1);
        assert_eq!(log.snapshot().version(), 2);
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn test_append_at_rejects_stale_version() {
        let log = HistoryLog::new();
        let snap = log.snapshot();

        assert_eq!(log.append_at(snap.version(), entry("A")).unwrap(), 1);
        let err = log.append_at(snap.version(), entry("B")).unwrap_err();
        assert!(matches!(
            err,
            HistoryError::VersionConflict {
                expected: 0,
                actual: 1
            }
        ));
        assert_eq!(log.version(), 1);
    }

    #[test]
    fn test_session_entries_exclude_seed() {
        let log = HistoryLog::with_seed(vec![entry("S-1"), entry("S-2")]);
        log.append_at(2, entry("REP-1")).unwrap();

        let snap = log.snapshot();
        assert_eq!(log.seed_len(), 2);
        assert_eq!(snap.session_entries().len(), 1);
        assert_eq!(snap.session_entries()[0].id, "REP-1");
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let log = HistoryLog::with_seed(vec![entry("HC-2024-0001")]);
        assert!(log.find("  hc-2024-0001 ").is_some());
        assert!(log.find("HC-2024-9999").is_none());
        assert!(log.find("   ").is_none());
    }

    #[test]
    fn test_concurrent_version_checked_appends() {
        let log = HistoryLog::new();
        let snap = log.snapshot();

        let successes: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let log = &log;
                    let version = snap.version();
                    s.spawn(move || log.append_at(version, entry(&format!("R-{i}"))).is_ok())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap() as usize).sum()
        });

        assert_eq!(successes, 1);
        assert_eq!(log.version(), 1);
    }
}
