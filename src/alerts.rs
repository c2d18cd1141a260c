//! Collaborator alerts
//!
//! The engine does not deliver notifications, but which alerts a scored
//! entry should raise is part of its observable contract:
//!
//! - threshold warning on the approval → CRITICAL "Audit Compliance Breach"
//! - otherwise an approval → INFO "Approval Logged"
//! - officer one approval short of the limit, with no breach already raised
//!   → WARNING "Approval Threshold Approaching"
//! - `score >= warning_score` → WARNING "<LEVEL> Risk Found: <entity>",
//!   CRITICAL once `score >= critical_score`

use crate::config::AlertConfig;
use crate::models::{ApprovalMetadata, HistoryEntry, RiskAnalysisResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Info => write!(f, "INFO"),
            AlertSeverity::Warning => write!(f, "WARNING"),
            AlertSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(severity: AlertSeverity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Alert raised at approval time
pub fn approval_alert(approval: &ApprovalMetadata) -> Alert {
    if approval.threshold_warning {
        let what = if approval.over_threshold {
            "has exceeded the approval threshold"
        } else {
            "has reached the approval review limit"
        };
        Alert::new(
            AlertSeverity::Critical,
            "Audit Compliance Breach",
            format!(
                "Officer {} {} ({} actions). This incident has been logged for mandatory audit review.",
                approval.approver_name, what, approval.approval_count
            ),
        )
    } else {
        Alert::new(
            AlertSeverity::Info,
            "Approval Logged",
            format!(
                "Transaction approved by {} ({}). Verification complete.",
                approval.approver_name, approval.approver_dept
            ),
        )
    }
}

/// Warning for an officer one approval short of `threshold`
pub fn near_threshold_alert(approval: &ApprovalMetadata, threshold: u64) -> Option<Alert> {
    let prior = approval.approval_count.saturating_sub(1);
    let is_near = prior >= threshold.saturating_sub(1);
    if !is_near || approval.over_threshold {
        return None;
    }

    Some(Alert::new(
        AlertSeverity::Warning,
        "Approval Threshold Approaching",
        format!(
            "Officer {} has {} prior approvals this session. Approaching the mandatory review limit (Threshold: {}).",
            approval.approver_name, prior, threshold
        ),
    ))
}

/// Alert for a high score, if any
pub fn risk_alert(
    entity_name: &str,
    analysis: &RiskAnalysisResult,
    approver: Option<&str>,
    config: &AlertConfig,
) -> Option<Alert> {
    if analysis.score < config.warning_score {
        return None;
    }

    let severity = if analysis.score >= config.critical_score {
        AlertSeverity::Critical
    } else {
        AlertSeverity::Warning
    };

    let follow_up = match approver {
        Some(name) => format!("Manual verification required following {}'s approval.", name),
        None => "Manual verification required.".to_string(),
    };

    Some(Alert::new(
        severity,
        format!("{} Risk Found: {}", analysis.level, entity_name),
        format!("{} anomaly factors detected. {}", analysis.factors.len(), follow_up),
    ))
}

/// Result of looking up a record by id
pub fn search_alert(query: &str, found: bool) -> Alert {
    if found {
        Alert::new(
            AlertSeverity::Info,
            "Record Found",
            format!("Accessing audit trail for Transaction ID: {}", query),
        )
    } else {
        Alert::new(
            AlertSeverity::Warning,
            "Invalid Audit ID",
            format!(
                "The transaction ID \"{}\" could not be located in the current registry.",
                query
            ),
        )
    }
}

/// Every alert a freshly appended entry raises, approval first
pub fn alerts_for(entry: &HistoryEntry, approval_threshold: u64, config: &AlertConfig) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(approval) = &entry.approval {
        alerts.push(approval_alert(approval));
        if !approval.threshold_warning {
            alerts.extend(near_threshold_alert(approval, approval_threshold));
        }
    }

    let approver = entry.approval.as_ref().map(|a| a.approver_name.as_str());
    alerts.extend(risk_alert(&entry.input.entity_name, &entry.analysis, approver, config));

    alerts
}
