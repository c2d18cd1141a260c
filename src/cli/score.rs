//! Score command - approve, score and record submissions

use anyhow::{anyhow, Context, Result};
use fiscal_sentinel::config::EngineConfig;
use fiscal_sentinel::models::{Category, Officer, TransactionRecord};
use fiscal_sentinel::reporters::{self, OutputFormat};
use fiscal_sentinel::service::AuditService;
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Where the records come from
pub enum Source {
    Flags(RecordFlags),
    Input(PathBuf),
    Batch(PathBuf),
}

/// Record fields given on the command line
pub struct RecordFlags {
    pub category: Option<String>,
    pub entity_id: Option<String>,
    pub entity_name: Option<String>,
    pub amount: Option<String>,
    pub location: Option<String>,
    pub reason: Option<String>,
    pub date: Option<String>,
    pub sub_category: Option<String>,
}

pub struct OfficerFlags {
    pub officer: Option<String>,
    pub department: Option<String>,
}

/// A record as read from a JSON file, optionally naming its approver
#[derive(Debug, Deserialize)]
struct Submission {
    #[serde(flatten)]
    record: TransactionRecord,
    #[serde(default)]
    officer: Option<String>,
    #[serde(default)]
    department: Option<String>,
}

impl RecordFlags {
    fn into_record(self) -> Result<TransactionRecord> {
        let category: Category = self
            .category
            .ok_or_else(|| anyhow!("--category is required (or use --input/--batch)"))?
            .parse()?;
        let entity_id = self
            .entity_id
            .ok_or_else(|| anyhow!("--entity-id is required"))?;
        let entity_name = self
            .entity_name
            .ok_or_else(|| anyhow!("--entity-name is required"))?;

        let mut record = TransactionRecord::new(category, entity_id, entity_name, 0.0)
            .with_amount_text(self.amount.as_deref().unwrap_or_default());
        if let Some(location) = self.location {
            record = record.with_location(location);
        }
        if let Some(reason) = self.reason {
            record = record.with_reason(reason);
        }
        if let Some(date) = self.date {
            record = record.with_date(date);
        }
        if let Some(sub_category) = self.sub_category {
            record = record.with_sub_category(sub_category);
        }
        Ok(record)
    }
}

/// Resolve the approving officer; file values win over flags
fn resolve_officer(
    name: Option<String>,
    department: Option<String>,
    flags: &OfficerFlags,
    config: &EngineConfig,
) -> Option<Officer> {
    let name = name.or_else(|| flags.officer.clone())?;
    let department = department
        .or_else(|| flags.department.clone())
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| config.approval.default_department.clone());
    Some(Officer::new(name, department))
}

fn read_submissions(path: &Path, batch: bool) -> Result<Vec<Submission>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if batch {
        serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array of records", path.display()))
    } else {
        let submission: Submission = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON record", path.display()))?;
        Ok(vec![submission])
    }
}

pub fn run(
    service: &AuditService,
    config: &EngineConfig,
    source: Source,
    officer: OfficerFlags,
    dry_run: bool,
    format: &str,
) -> Result<()> {
    let format: OutputFormat = format.parse()?;

    let submissions: Vec<(TransactionRecord, Option<Officer>)> = match source {
        Source::Flags(flags) => {
            let record = flags.into_record()?;
            vec![(record, resolve_officer(None, None, &officer, config))]
        }
        Source::Input(path) => read_submissions(&path, false)?
            .into_iter()
            .map(|s| {
                let who = resolve_officer(s.officer, s.department, &officer, config);
                (s.record, who)
            })
            .collect(),
        Source::Batch(path) => read_submissions(&path, true)?
            .into_iter()
            .map(|s| {
                let who = resolve_officer(s.officer, s.department, &officer, config);
                (s.record, who)
            })
            .collect(),
    };

    if dry_run {
        return preview(service, submissions, format);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let outcomes = runtime
        .block_on(service.submit_all(submissions))
        .context("Submission failed")?;

    println!("{}", reporters::render_outcomes(&outcomes, format)?);
    Ok(())
}

/// Score against current history without approving or appending
fn preview(
    service: &AuditService,
    submissions: Vec<(TransactionRecord, Option<Officer>)>,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = service.history().snapshot();

    for (record, officer) in submissions {
        let officer_name = officer.filter(|o| !o.is_anonymous()).map(|o| o.name);
        let breakdown = service
            .scorer()
            .score_with_breakdown(&record, &snapshot, officer_name.as_deref());

        match format {
            OutputFormat::Text => println!("{}", service.scorer().explain(&breakdown)),
            OutputFormat::Json => {
                let signals: Vec<_> = breakdown
                    .signals
                    .iter()
                    .map(|s| {
                        let detector = service.scorer().engine().detector(s.detector);
                        json!({
                            "detector": s.detector,
                            "category": detector.map(|d| d.category()),
                            "description": detector.map(|d| d.description()),
                            "contribution": s.contribution,
                        })
                    })
                    .collect();
                let value = json!({
                    "input": record,
                    "analysis": breakdown.result,
                    "signals": signals,
                    "detectorsRun": breakdown.summary.detectors_run,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> RecordFlags {
        RecordFlags {
            category: Some("healthcare".into()),
            entity_id: Some("HID-1".into()),
            entity_name: Some("Apollo".into()),
            amount: Some("9000000 INR".into()),
            location: Some("Pune".into()),
            reason: None,
            date: None,
            sub_category: None,
        }
    }

    #[test]
    fn test_flags_build_record() {
        let record = flags().into_record().unwrap();
        assert_eq!(record.category, Category::Healthcare);
        assert_eq!(record.amount, 9_000_000.0);
        assert_eq!(record.location, "Pune");
    }

    #[test]
    fn test_missing_category_is_error() {
        let mut f = flags();
        f.category = None;
        assert!(f.into_record().is_err());

        let mut f = flags();
        f.category = Some("lottery".into());
        assert!(f.into_record().is_err());
    }

    #[test]
    fn test_officer_defaults_department() {
        let config = EngineConfig::default();
        let none = OfficerFlags { officer: None, department: None };
        assert!(resolve_officer(None, None, &none, &config).is_none());

        let officer = resolve_officer(Some("J. Rao".into()), None, &none, &config).unwrap();
        assert_eq!(officer.department, "Audit Oversight Unit");

        let flagged = OfficerFlags {
            officer: Some("K. Iyer".into()),
            department: Some("Finance".into()),
        };
        let officer = resolve_officer(Some("J. Rao".into()), None, &flagged, &config).unwrap();
        assert_eq!(officer.name, "J. Rao");
        assert_eq!(officer.department, "Finance");
    }

    #[test]
    fn test_submission_json_keeps_officer_out_of_attributes() {
        let submission: Submission = serde_json::from_str(
            r#"{"category":"taxation","entityId":"GST-1","entityName":"Acme","amount":"12000",
                "officer":"J. Rao","dueDate":"2024-03-31"}"#,
        )
        .unwrap();
        assert_eq!(submission.officer.as_deref(), Some("J. Rao"));
        assert_eq!(submission.record.amount, 12_000.0);
        assert!(submission.record.attributes.contains_key("dueDate"));
        assert!(!submission.record.attributes.contains_key("officer"));
    }
}
