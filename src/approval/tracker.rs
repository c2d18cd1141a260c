//! Approval threshold tracker
//!
//! Counts approvals per officer (trimmed, case-insensitive) and flags
//! officers nearing or past the configured limit. Runs before scoring
//! and never touches the score; the duty-separation detector reads the
//! same history independently.

use crate::approval::store::{CounterStore, InMemoryCounterStore};
use crate::config::ApprovalConfig;
use crate::models::{normalize_name, ApprovalMetadata, HistoryEntry, Officer};
use chrono::Utc;
use tracing::{debug, warn};

/// Where an officer stands relative to the threshold before their next approval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalStatus {
    /// Approvals already recorded
    pub prior_count: u64,
    /// `prior_count >= threshold - 1`
    pub is_near: bool,
    /// `prior_count >= threshold`
    pub is_over: bool,
}

impl ApprovalStatus {
    fn from_prior(prior_count: u64, threshold: u64) -> Self {
        Self {
            prior_count,
            is_near: prior_count >= threshold.saturating_sub(1),
            is_over: prior_count >= threshold,
        }
    }
}

pub struct ApprovalThresholdTracker<S: CounterStore = InMemoryCounterStore> {
    store: S,
    threshold: u64,
    warn_on_near: bool,
    default_department: String,
}

impl ApprovalThresholdTracker<InMemoryCounterStore> {
    /// Tracker over a fresh in-memory counter table
    pub fn in_memory(config: &ApprovalConfig) -> Self {
        Self::new(InMemoryCounterStore::new(), config)
    }
}

impl<S: CounterStore> ApprovalThresholdTracker<S> {
    pub fn new(store: S, config: &ApprovalConfig) -> Self {
        Self {
            store,
            threshold: config.threshold,
            warn_on_near: config.warn_on_near,
            default_department: config.default_department.clone(),
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Current standing without recording anything
    pub fn status(&self, officer_name: &str) -> ApprovalStatus {
        let prior = self.store.get(&normalize_name(officer_name));
        ApprovalStatus::from_prior(prior, self.threshold)
    }

    /// Record one approval and build its metadata.
    ///
    /// Returns `None` for an anonymous officer: no counter is touched.
    pub fn record_approval(&self, officer: &Officer) -> Option<ApprovalMetadata> {
        if officer.is_anonymous() {
            return None;
        }

        let key = normalize_name(&officer.name);
        let count = self.store.increment(&key);
        let status = ApprovalStatus::from_prior(count.saturating_sub(1), self.threshold);

        if status.is_over {
            warn!(
                "Officer {} exceeded approval threshold ({} approvals, limit {})",
                officer.name.trim(),
                count,
                self.threshold
            );
        } else if status.is_near {
            warn!(
                "Officer {} is approaching the approval threshold ({} of {})",
                officer.name.trim(),
                count,
                self.threshold
            );
        } else {
            debug!("Officer {} approval #{}", officer.name.trim(), count);
        }

        let department = if officer.department.trim().is_empty() {
            self.default_department.clone()
        } else {
            officer.department.trim().to_string()
        };

        Some(ApprovalMetadata {
            approver_name: officer.name.trim().to_string(),
            approver_dept: department,
            timestamp: Utc::now(),
            approval_count: count,
            threshold_warning: if self.warn_on_near {
                status.is_near
            } else {
                status.is_over
            },
            over_threshold: status.is_over,
        })
    }

    /// Rebuild counters from previously recorded approvals
    pub fn replay(&self, history: &[HistoryEntry]) -> usize {
        let mut replayed = 0;
        for approval in history.iter().filter_map(|h| h.approval.as_ref()) {
            if approval.approver_name.trim().is_empty() {
                continue;
            }
            self.store.increment(&normalize_name(&approval.approver_name));
            replayed += 1;
        }
        debug!("Replayed {} approvals into tracker", replayed);
        replayed
    }
}
