//! JSON reporter
//!
//! Pretty-printed JSON for piping to jq or other tooling. Entries keep
//! the camelCase field names they are stored with.

use crate::models::HistoryEntry;
use crate::service::AuditOutcome;
use crate::summary::SessionSummary;
use anyhow::Result;
use serde_json::{json, Value};

fn outcome_value(outcome: &AuditOutcome) -> Result<Value> {
    let signals: Vec<Value> = outcome
        .signals
        .iter()
        .map(|s| {
            json!({
                "detector": s.detector,
                "contribution": s.contribution,
                "message": s.message,
            })
        })
        .collect();

    Ok(json!({
        "entry": serde_json::to_value(&outcome.entry)?,
        "signals": signals,
        "alerts": serde_json::to_value(&outcome.alerts)?,
    }))
}

/// One object for a single outcome, an array for a batch
pub fn render_outcomes(outcomes: &[AuditOutcome]) -> Result<String> {
    let value = match outcomes {
        [single] => outcome_value(single)?,
        many => Value::Array(many.iter().map(outcome_value).collect::<Result<Vec<_>>>()?),
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn render_entry(entry: &HistoryEntry) -> Result<String> {
    Ok(serde_json::to_string_pretty(entry)?)
}

pub fn render_summary(summary: &SessionSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}
