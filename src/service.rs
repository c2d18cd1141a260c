//! Audit session service
//!
//! Drives one submission through the full flow:
//!
//! ```text
//! approve (tracker) → snapshot history → [latency] → score (blocking pool)
//!                                   ↑                        │
//!                                   └── version conflict ────┤
//!                                                            ▼
//!                                    append_at(version) → persist → alerts
//! ```
//!
//! The approval is recorded once, before scoring, and is not rolled back
//! if scoring later fails. A timeout fails the whole submission; nothing
//! is appended.

use crate::alerts::{alerts_for, Alert};
use crate::approval::{ApprovalStatus, ApprovalThresholdTracker, CounterStore, InMemoryCounterStore};
use crate::config::{AlertConfig, ApprovalConfig, EngineConfig};
use crate::detectors::Signal;
use crate::history::{seed_history, HistoryError, HistoryLog, HistorySnapshot, SessionStore};
use crate::models::{HistoryEntry, Officer, TransactionRecord};
use crate::scoring::{RiskScorer, ScoreBreakdown};
use crate::summary::SessionSummary;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Scoring timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("History kept changing during scoring, gave up after {attempts} attempts")]
    HistoryConflict { attempts: usize },

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("Scoring task failed: {0}")]
    Join(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Everything one submission produced
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    /// The entry as appended to history
    pub entry: HistoryEntry,
    /// Fired signals with their contributions, in evaluation order
    pub signals: Vec<Signal>,
    /// Alerts the collaborator should raise, approval first
    pub alerts: Vec<Alert>,
}

pub struct AuditService {
    scorer: Arc<RiskScorer>,
    tracker: ApprovalThresholdTracker<Arc<dyn CounterStore>>,
    approval_config: ApprovalConfig,
    history: HistoryLog,
    session_store: Option<SessionStore>,
    alerts: AlertConfig,
    latency: Duration,
    timeout: Duration,
    max_append_retries: usize,
}

impl AuditService {
    /// Service over an existing history log with in-memory approval counters
    pub fn new(config: &EngineConfig, history: HistoryLog) -> Self {
        let counters: Arc<dyn CounterStore> = Arc::new(InMemoryCounterStore::new());
        Self {
            scorer: Arc::new(RiskScorer::from_config(config)),
            tracker: ApprovalThresholdTracker::new(counters, &config.approval),
            approval_config: config.approval.clone(),
            history,
            session_store: None,
            alerts: config.alerts.clone(),
            latency: Duration::from_millis(config.service.latency_ms),
            timeout: Duration::from_millis(config.service.timeout_ms),
            max_append_retries: config.service.max_append_retries,
        }
    }

    /// Service whose history starts with the seed corpus
    pub fn with_seed(config: &EngineConfig) -> Self {
        Self::new(config, HistoryLog::with_seed(seed_history(config.service.seed)))
    }

    /// Back the approval tracker with a different counter store
    pub fn with_counter_store(mut self, counters: Arc<dyn CounterStore>) -> Self {
        self.tracker = ApprovalThresholdTracker::new(counters, &self.approval_config);
        self
    }

    /// Persist every appended entry to `store`
    pub fn with_session_store(mut self, store: SessionStore) -> Self {
        self.session_store = Some(store);
        self
    }

    /// Reload persisted session entries into history and replay their
    /// approvals into the tracker. Returns the number of entries restored.
    pub fn restore(&self) -> ServiceResult<usize> {
        let Some(store) = &self.session_store else {
            return Ok(0);
        };

        let entries = store.load_all()?;
        let restored = entries.len();
        self.tracker.replay(&entries);
        self.history.extend(entries);

        info!(
            "Restored {} session entries from {}",
            restored,
            store.data_path().display()
        );
        Ok(restored)
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    pub fn approval_threshold(&self) -> u64 {
        self.tracker.threshold()
    }

    /// Where an officer stands before their next approval
    pub fn approval_status(&self, officer_name: &str) -> ApprovalStatus {
        self.tracker.status(officer_name)
    }

    /// Approve, score and record one transaction
    pub async fn submit(
        &self,
        record: TransactionRecord,
        officer: Option<Officer>,
    ) -> ServiceResult<AuditOutcome> {
        let officer = officer.filter(|o| !o.is_anonymous());
        let approval = officer.as_ref().and_then(|o| self.tracker.record_approval(o));
        let officer_name = officer.map(|o| o.name);

        let attempts = self.max_append_retries + 1;
        for attempt in 1..=attempts {
            let snapshot = self.history.snapshot();
            let breakdown = self
                .score_snapshot(record.clone(), snapshot.clone(), officer_name.clone())
                .await?;

            let entry = HistoryEntry::new(record.clone(), breakdown.result, approval.clone());
            match self.history.append_at(snapshot.version(), entry.clone()) {
                Ok(version) => {
                    debug!("Entry {} recorded at version {}", entry.id, version);
                    if let Some(store) = &self.session_store {
                        store.record(&entry)?;
                    }
                    let alerts = alerts_for(&entry, self.tracker.threshold(), &self.alerts);
                    return Ok(AuditOutcome {
                        entry,
                        signals: breakdown.signals,
                        alerts,
                    });
                }
                Err(HistoryError::VersionConflict { .. }) => {
                    warn!(
                        "History moved while scoring {} (attempt {}/{}), rescoring",
                        record.entity_id, attempt, attempts
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::HistoryConflict { attempts })
    }

    /// Submit records one after another; each sees the ones before it
    pub async fn submit_all(
        &self,
        submissions: Vec<(TransactionRecord, Option<Officer>)>,
    ) -> ServiceResult<Vec<AuditOutcome>> {
        let mut outcomes = Vec::with_capacity(submissions.len());
        for (record, officer) in submissions {
            outcomes.push(self.submit(record, officer).await?);
        }
        Ok(outcomes)
    }

    /// Look up any entry (seed or session) by id
    pub fn find(&self, id: &str) -> Option<HistoryEntry> {
        self.history.find(id)
    }

    /// Dashboard statistics over session entries
    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_entries(self.history.snapshot().session_entries())
    }

    /// Score on the blocking pool under the configured deadline
    async fn score_snapshot(
        &self,
        record: TransactionRecord,
        snapshot: HistorySnapshot,
        officer: Option<String>,
    ) -> ServiceResult<ScoreBreakdown> {
        let scorer = Arc::clone(&self.scorer);
        let latency = self.latency;

        let work = async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            tokio::task::spawn_blocking(move || {
                scorer.score_with_breakdown(&record, &snapshot, officer.as_deref())
            })
            .await
            .map_err(|e| ServiceError::Join(e.to_string()))
        };

        match tokio::time::timeout(self.timeout, work).await {
            Ok(result) => result,
            Err(_) => {
                let after_ms = self.timeout.as_millis() as u64;
                warn!("Scoring timed out after {}ms", after_ms);
                Err(ServiceError::Timeout { after_ms })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertSeverity;
    use crate::models::{Category, RiskLevel};

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn record(id: &str, amount: f64) -> TransactionRecord {
        TransactionRecord::new(Category::Welfare, id, "Scheme", amount)
    }

    #[tokio::test]
    async fn test_submit_appends_entry() {
        let service = AuditService::new(&config(), HistoryLog::new());
        let outcome = service
            .submit(record("W-1", 12_000.0), Some(Officer::new("J. Rao", "Finance")))
            .await
            .unwrap();

        assert_eq!(outcome.entry.analysis.score, 15);
        assert_eq!(outcome.entry.approval.as_ref().unwrap().approval_count, 1);
        assert_eq!(service.history().version(), 1);
        assert!(service.find(&outcome.entry.id.to_uppercase()).is_some());
        assert_eq!(outcome.alerts[0].title, "Approval Logged");
    }

    #[tokio::test]
    async fn test_second_approval_triggers_duty_separation() {
        let service = AuditService::new(&config(), HistoryLog::new());
        let officer = Officer::new("J. Rao", "Finance");
        service.submit(record("W-1", 123.0), Some(officer)).await.unwrap();

        let outcome = service
            .submit(record("W-2", 456.0), Some(Officer::new(" j. rao ", "Finance")))
            .await
            .unwrap();
        assert_eq!(outcome.entry.analysis.score, 80);
        assert_eq!(outcome.entry.analysis.level, RiskLevel::Critical);
        assert_eq!(outcome.signals[0].detector, "duty-separation");
        assert!(outcome
            .alerts
            .iter()
            .any(|a| a.severity == AlertSeverity::Critical && a.title.starts_with("CRITICAL Risk Found")));
    }

    #[tokio::test]
    async fn test_anonymous_officer_has_no_approval() {
        let service = AuditService::new(&config(), HistoryLog::new());
        let outcome = service
            .submit(record("W-1", 1.0), Some(Officer::new("  ", "Finance")))
            .await
            .unwrap();
        assert!(outcome.entry.approval.is_none());
        assert!(outcome.alerts.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_fails_whole_call() {
        let mut cfg = config();
        cfg.service.latency_ms = 200;
        cfg.service.timeout_ms = 20;
        let service = AuditService::new(&cfg, HistoryLog::new());

        let err = service.submit(record("W-1", 1.0), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Timeout { after_ms: 20 }));
        assert_eq!(service.history().version(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_all_recorded() {
        let mut cfg = config();
        cfg.service.max_append_retries = 100;
        let service = Arc::new(AuditService::new(&cfg, HistoryLog::new()));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .submit(record(&format!("W-{i}"), 100.0 + i as f64), None)
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let snapshot = service.history().snapshot();
        assert_eq!(snapshot.version(), 16);
        let mut ids: Vec<&str> = snapshot.iter().map(|e| e.input.entity_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }

    #[tokio::test]
    async fn test_summary_covers_session_only() {
        let service = AuditService::with_seed(&config());
        let seeded = service.history().seed_len();
        assert_eq!(seeded, 190);
        assert_eq!(service.summary().report_count, 0);

        service.submit(record("W-1", 5_000.0), None).await.unwrap();
        let summary = service.summary();
        assert_eq!(summary.report_count, 1);
        assert_eq!(summary.total_audited, 5_000.0);
        assert!(service.find("HIST-HC-0").is_some());
    }
}
