//! Base detector trait and types
//!
//! This module defines the core abstractions for anomaly detection:
//! - `Detector` trait that every heuristic implements
//! - `Signal` for a triggered heuristic's contribution and explanation
//! - `ScoringContext`, the candidate plus pre-sliced history views

use crate::models::{normalize_name, HistoryEntry, TransactionRecord};
use std::collections::HashMap;

/// A triggered heuristic
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Name of the detector that fired
    pub detector: &'static str,
    /// Risk points added to the raw total (before clamping)
    pub contribution: f64,
    /// Human-readable explanation
    pub message: String,
}

impl Signal {
    pub fn new(detector: &'static str, contribution: f64, message: impl Into<String>) -> Self {
        Self {
            detector,
            contribution,
            message: message.into(),
        }
    }
}

/// Read-only view of one scoring request.
///
/// History is sliced once up front so every detector sees the same
/// category and entity views and none of them touches the full log
/// unless it needs to.
#[derive(Debug, Clone)]
pub struct ScoringContext<'a> {
    /// The record being scored
    pub candidate: &'a TransactionRecord,
    /// Full history snapshot, all categories
    pub history: &'a [HistoryEntry],
    /// History entries in the candidate's category
    pub category_history: Vec<&'a HistoryEntry>,
    /// Amounts of every same-category entry
    pub category_amounts: Vec<f64>,
    /// Amounts of same-category entries filed by the candidate's entity
    pub entity_amounts: Vec<f64>,
    /// Approving officer as supplied (blank means absent)
    pub officer: Option<&'a str>,
}

impl<'a> ScoringContext<'a> {
    pub fn new(
        candidate: &'a TransactionRecord,
        history: &'a [HistoryEntry],
        officer: Option<&'a str>,
    ) -> Self {
        let category_history: Vec<&HistoryEntry> = history
            .iter()
            .filter(|h| h.input.category == candidate.category)
            .collect();

        let category_amounts = category_history.iter().map(|h| h.input.amount).collect();
        let entity_amounts = category_history
            .iter()
            .filter(|h| h.input.entity_id == candidate.entity_id)
            .map(|h| h.input.amount)
            .collect();

        Self {
            candidate,
            history,
            category_history,
            category_amounts,
            entity_amounts,
            officer: officer.filter(|o| !o.trim().is_empty()),
        }
    }

    /// Candidate amount (already parsed; unparseable input is 0)
    pub fn amount(&self) -> f64 {
        self.candidate.amount
    }

    /// Officer name trimmed and lowercased, if one was supplied
    pub fn normalized_officer(&self) -> Option<String> {
        self.officer.map(normalize_name)
    }
}

/// Trait for all anomaly detectors
///
/// Detectors are pure: they read the scoring context and either return
/// a signal or nothing. They never fail and never mutate history.
///
/// # Example Implementation
///
/// ```ignore
/// pub struct MyDetector;
///
/// impl Detector for MyDetector {
///     fn name(&self) -> &'static str {
///         "my-detector"
///     }
///
///     fn description(&self) -> &'static str {
///         "Detects my specific anomaly"
///     }
///
///     fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
///         None
///     }
/// }
/// ```
pub trait Detector: Send + Sync {
    /// Unique kebab-case identifier, also the config section name
    fn name(&self) -> &'static str;

    /// Human-readable description of what this detector finds
    fn description(&self) -> &'static str;

    /// Evaluate one candidate against its context
    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Signal>;

    /// Category of anomaly this detector finds
    fn category(&self) -> &'static str {
        "statistical"
    }
}

/// Result from running a single detector
#[derive(Debug, Clone)]
pub struct DetectorResult {
    pub detector_name: &'static str,
    pub signal: Option<Signal>,
}

/// Summary statistics from one pipeline run
#[derive(Debug, Clone, Default)]
pub struct DetectionSummary {
    /// Total number of detectors run
    pub detectors_run: usize,
    /// Number of detectors that produced a non-zero contribution
    pub signals_fired: usize,
    /// Contribution per fired detector
    pub by_detector: HashMap<&'static str, f64>,
    /// Raw contribution total before clamping
    pub raw_total: f64,
    /// Total execution time in microseconds
    pub duration_us: u64,
}

impl DetectionSummary {
    /// Update summary with a detector result
    pub fn add_result(&mut self, result: &DetectorResult) {
        self.detectors_run += 1;
        if let Some(signal) = &result.signal {
            self.signals_fired += 1;
            self.raw_total += signal.contribution;
            *self.by_detector.entry(result.detector_name).or_insert(0.0) += signal.contribution;
        }
    }
}
