//! Session persistence
//!
//! Stores session history entries in JSONL format, one entry per line,
//! so a CLI session survives across invocations. Seed entries are never
//! written; they are regenerated on load.

use crate::history::HistoryResult;
use crate::models::HistoryEntry;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// JSONL-backed session store
#[derive(Debug, Clone)]
pub struct SessionStore {
    data_path: PathBuf,
}

impl SessionStore {
    /// Store at the default per-user location
    pub fn new() -> Self {
        let data_path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fiscal-sentinel")
            .join("session.jsonl");

        Self { data_path }
    }

    /// Store at a custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: path.into(),
        }
    }

    /// Append one entry
    pub fn record(&self, entry: &HistoryEntry) -> HistoryResult<()> {
        if let Some(parent) = self.data_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(entry)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.data_path)?;

        writeln!(file, "{}", json)?;
        Ok(())
    }

    /// Load every readable entry in file order.
    ///
    /// Lines that fail to parse are skipped with a warning so one corrupt
    /// line does not lose the rest of the session.
    pub fn load_all(&self) -> HistoryResult<Vec<HistoryEntry>> {
        if !self.data_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.data_path)?;
        let reader = BufReader::new(file);

        let mut entries = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    "Skipping unreadable session entry at {}:{}: {}",
                    self.data_path.display(),
                    line_no + 1,
                    e
                ),
            }
        }

        debug!("Loaded {} session entries from {}", entries.len(), self.data_path.display());
        Ok(entries)
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApprovalMetadata, Category, RiskAnalysisResult, TransactionRecord};
    use chrono::Utc;
    use tempfile::tempdir;

    fn entry(id: &str, approver: Option<&str>) -> HistoryEntry {
        let approval = approver.map(|name| ApprovalMetadata {
            approver_name: name.to_string(),
            approver_dept: "Finance".to_string(),
            timestamp: Utc::now(),
            approval_count: 1,
            threshold_warning: false,
            over_threshold: false,
        });
        HistoryEntry::new(
            TransactionRecord::new(Category::ForeignAid, "FA-1", "Relief Fund", 2500.0)
                .with_attribute("grantRef", serde_json::json!("G-77")),
            RiskAnalysisResult::baseline(20),
            approval,
        )
        .with_id(id)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = SessionStore::with_path(dir.path().join("none.jsonl"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_record_and_load_preserves_order() {
        let dir = tempdir().unwrap();
        let store = SessionStore::with_path(dir.path().join("nested").join("session.jsonl"));

        store.record(&entry("REP-1", Some("J. Rao"))).unwrap();
        store.record(&entry("REP-2", None)).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "REP-1");
        assert_eq!(loaded[0].approval.as_ref().unwrap().approver_name, "J. Rao");
        assert_eq!(loaded[0].input.attributes.get("grantRef"), Some(&serde_json::json!("G-77")));
        assert!(loaded[1].approval.is_none());
    }

    #[test]
    fn test_corrupt_line_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let store = SessionStore::with_path(&path);

        store.record(&entry("REP-1", None)).unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{not json").unwrap();
        writeln!(file).unwrap();
        store.record(&entry("REP-2", None)).unwrap();

        let ids: Vec<String> = store.load_all().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["REP-1", "REP-2"]);
    }
}
