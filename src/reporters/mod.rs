//! Output reporters for audit results
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON

mod json;
mod text;

use crate::models::HistoryEntry;
use crate::service::AuditOutcome;
use crate::summary::SessionSummary;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render the outcome of one or more submissions
pub fn render_outcomes(outcomes: &[AuditOutcome], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_outcomes(outcomes)),
        OutputFormat::Json => json::render_outcomes(outcomes),
    }
}

/// Render a single stored entry
pub fn render_entry(entry: &HistoryEntry, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_entry(entry)),
        OutputFormat::Json => json::render_entry(entry),
    }
}

/// Render the session dashboard
pub fn render_summary(summary: &SessionSummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_summary(summary)),
        OutputFormat::Json => json::render_summary(summary),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::alerts::{Alert, AlertSeverity};
    use crate::detectors::Signal;
    use crate::models::{Category, RiskAnalysisResult, RiskLevel, TransactionRecord};
    use chrono::Utc;

    /// A scored outcome with two signals and one alert
    pub(crate) fn test_outcome() -> AuditOutcome {
        let signals = vec![
            Signal::new("velocity", 70.0, "High-frequency stacking: entity HID-1 has filed 4 transactions"),
            Signal::new("rounding", 15.0, "Heuristic warning: perfectly rounded amount"),
        ];
        let analysis = RiskAnalysisResult {
            score: 85,
            level: RiskLevel::Critical,
            factors: signals.iter().map(|s| s.message.clone()).collect(),
            timestamp: Utc::now(),
        };
        let entry = HistoryEntry::new(
            TransactionRecord::new(Category::Healthcare, "HID-1", "Apollo", 12_000.0),
            analysis,
            None,
        )
        .with_id("REP-1");

        AuditOutcome {
            entry,
            signals,
            alerts: vec![Alert {
                severity: AlertSeverity::Critical,
                title: "CRITICAL Risk Found: Apollo".to_string(),
                message: "2 anomaly factors detected. Manual verification required.".to_string(),
            }],
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
    }
}
