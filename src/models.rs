//! Core data models for fiscal-sentinel
//!
//! These models describe the audit records flowing through the engine:
//! candidate transactions, risk results, approval metadata and the
//! immutable history entries that later scoring calls read back.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::OnceLock;

/// Audit sector a transaction belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Healthcare,
    Education,
    Defence,
    Taxation,
    Tenders,
    Payroll,
    ForeignAid,
    Welfare,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Healthcare,
            Category::Education,
            Category::Defence,
            Category::Taxation,
            Category::Tenders,
            Category::Payroll,
            Category::ForeignAid,
            Category::Welfare,
        ]
    }

    /// Identifier used on the wire and in the CLI
    pub fn id(&self) -> &'static str {
        match self {
            Category::Healthcare => "healthcare",
            Category::Education => "education",
            Category::Defence => "defence",
            Category::Taxation => "taxation",
            Category::Tenders => "tenders",
            Category::Payroll => "payroll",
            Category::ForeignAid => "foreign-aid",
            Category::Welfare => "welfare",
        }
    }

    /// Human-readable sector title
    pub fn title(&self) -> &'static str {
        match self {
            Category::Healthcare => "Public Healthcare",
            Category::Education => "Education & Scholarships",
            Category::Defence => "Defence & National Security",
            Category::Taxation => "Taxation & Revenue",
            Category::Tenders => "Govt Projects & Tenders",
            Category::Payroll => "Employee Salaries & Payroll",
            Category::ForeignAid => "Foreign Aid & Disaster Relief",
            Category::Welfare => "Government Welfare Schemes",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Category::all()
            .iter()
            .copied()
            .find(|c| c.id() == wanted)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown category '{}'. Valid categories: {}",
                    s,
                    Category::all()
                        .iter()
                        .map(|c| c.id())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

/// Normalize a person or entity name for comparison (trimmed, lowercase)
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parse a user-supplied amount the way a form field is read.
///
/// Takes the longest leading decimal number (`"12000abc"` -> 12000).
/// Anything unparseable, negative or non-finite becomes 0.
pub fn parse_amount(text: &str) -> f64 {
    static NUMBER_PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    let re = NUMBER_PREFIX.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").ok()
    });

    let value = re
        .as_ref()
        .and_then(|re| re.find(text.trim_start()))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);

    sanitize_amount(value)
}

fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Accepts either a JSON number or free text for `amount`
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AmountRepr {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<AmountRepr>::deserialize(deserializer)? {
        Some(AmountRepr::Number(n)) => sanitize_amount(n),
        Some(AmountRepr::Text(s)) => parse_amount(&s),
        None => 0.0,
    })
}

/// A submitted expenditure record (candidate or historical input)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub entity_name: String,
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub date: String,
    /// Sector-specific attributes (due dates, tender estimates, salary parts).
    /// Carried through untouched; no detector reads them.
    #[serde(default, flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl TransactionRecord {
    pub fn new(
        category: Category,
        entity_id: impl Into<String>,
        entity_name: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            category,
            sub_category: None,
            entity_name: entity_name.into(),
            entity_id: entity_id.into(),
            location: String::new(),
            amount: sanitize_amount(amount),
            reason: String::new(),
            date: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set the amount from form text
    pub fn with_amount_text(mut self, text: &str) -> Self {
        self.amount = parse_amount(text);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_sub_category(mut self, sub_category: impl Into<String>) -> Self {
        self.sub_category = Some(sub_category.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// Discrete risk classification
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Classify a clamped, rounded score
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 80 => RiskLevel::Critical,
            s if s >= 55 => RiskLevel::High,
            s if s >= 30 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Outcome of scoring one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysisResult {
    /// 0-100 inclusive
    pub score: u8,
    pub level: RiskLevel,
    /// One explanation per triggered heuristic, in evaluation order
    pub factors: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl RiskAnalysisResult {
    /// Result for a record that was never scored by this engine (seed data)
    pub fn baseline(score: u8) -> Self {
        Self {
            score,
            level: RiskLevel::from_score(score),
            factors: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

/// The human officer approving a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Officer {
    pub name: String,
    pub department: String,
}

impl Officer {
    pub fn new(name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            department: department.into(),
        }
    }

    /// Blank names carry no identity and skip approval checks
    pub fn is_anonymous(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// Metadata captured once per approval action, before scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalMetadata {
    pub approver_name: String,
    pub approver_dept: String,
    pub timestamp: DateTime<Utc>,
    /// 1-based, includes this approval
    pub approval_count: u64,
    pub threshold_warning: bool,
    /// Prior count had already reached the configured threshold
    #[serde(default)]
    pub over_threshold: bool,
}

/// Lifecycle state of a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryStatus {
    #[default]
    Analyzed,
}

/// Immutable record of a scored transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub status: EntryStatus,
    pub input: TransactionRecord,
    pub analysis: RiskAnalysisResult,
    /// Absent for entries that predate approval tracking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<ApprovalMetadata>,
}

impl HistoryEntry {
    /// New analyzed entry with a fresh id
    pub fn new(
        input: TransactionRecord,
        analysis: RiskAnalysisResult,
        approval: Option<ApprovalMetadata>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date: Utc::now(),
            status: EntryStatus::Analyzed,
            input,
            analysis,
            approval,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Whether this entry was approved by the given (already normalized) officer
    pub fn approved_by(&self, normalized_officer: &str) -> bool {
        self.approval
            .as_ref()
            .is_some_and(|a| normalize_name(&a.approver_name) == normalized_officer)
    }
}
