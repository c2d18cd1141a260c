//! Composite risk scorer

use crate::config::EngineConfig;
use crate::detectors::{DetectionSummary, DetectorEngine, ScoringContext, Signal};
use crate::models::{HistoryEntry, RiskAnalysisResult, RiskLevel, TransactionRecord};
use chrono::Utc;
use tracing::info;

/// Complete score breakdown for transparency
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    /// The result handed back to callers
    pub result: RiskAnalysisResult,
    /// Fired signals in evaluation order
    pub signals: Vec<Signal>,
    /// Per-run detector statistics
    pub summary: DetectionSummary,
}

/// Clamp a raw contribution total into 0..=100 and round to an integer
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u8
}

/// Runs the detector pipeline and folds its signals into a result
pub struct RiskScorer {
    engine: DetectorEngine,
}

impl RiskScorer {
    pub fn new(engine: DetectorEngine) -> Self {
        Self { engine }
    }

    /// Scorer over the built-in heuristics as configured
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(DetectorEngine::with_defaults(config))
    }

    pub fn engine(&self) -> &DetectorEngine {
        &self.engine
    }

    /// Score a candidate against a frozen history snapshot.
    ///
    /// Never fails: thin history and unparseable amounts simply leave
    /// the relevant detectors silent.
    pub fn score(
        &self,
        candidate: &TransactionRecord,
        history: &[HistoryEntry],
        officer: Option<&str>,
    ) -> RiskAnalysisResult {
        self.score_with_breakdown(candidate, history, officer).result
    }

    /// Score and keep the per-signal detail
    pub fn score_with_breakdown(
        &self,
        candidate: &TransactionRecord,
        history: &[HistoryEntry],
        officer: Option<&str>,
    ) -> ScoreBreakdown {
        let ctx = ScoringContext::new(candidate, history, officer);
        let (signals, summary) = self.engine.run(&ctx);

        let raw: f64 = signals.iter().map(|s| s.contribution).sum();
        let score = clamp_score(raw);
        let level = RiskLevel::from_score(score);

        info!(
            "Scored {} {} ({}): {} {} from {} signal(s)",
            candidate.category,
            candidate.entity_id,
            candidate.entity_name,
            score,
            level,
            signals.len()
        );

        let result = RiskAnalysisResult {
            score,
            level,
            factors: signals.iter().map(|s| s.message.clone()).collect(),
            timestamp: Utc::now(),
        };

        ScoreBreakdown {
            result,
            signals,
            summary,
        }
    }

    /// Generate a human-readable explanation of a score
    pub fn explain(&self, breakdown: &ScoreBreakdown) -> String {
        let mut lines = Vec::new();
        let result = &breakdown.result;

        lines.push(format!("# Risk Score: {} ({})\n", result.score, result.level));

        lines.push("## Scoring Formula\n".to_string());
        lines.push("```".to_string());
        lines.push("Score = round(clamp(Σ contributions, 0, 100))".to_string());
        lines.push("Level = CRITICAL ≥ 80, HIGH ≥ 55, MEDIUM ≥ 30, else LOW".to_string());
        lines.push("```\n".to_string());

        lines.push("## Signals\n".to_string());
        if breakdown.signals.is_empty() {
            lines.push("- No anomaly signals fired".to_string());
        }
        for signal in &breakdown.signals {
            match self.engine.detector(signal.detector) {
                Some(detector) => lines.push(format!(
                    "- **{}** ({}): +{:.1}\n  _{}_\n  {}",
                    signal.detector,
                    detector.category(),
                    signal.contribution,
                    detector.description(),
                    signal.message
                )),
                None => lines.push(format!(
                    "- **{}**: +{:.1}\n  {}",
                    signal.detector, signal.contribution, signal.message
                )),
            }
        }

        lines.push(String::new());
        lines.push(format!(
            "- Raw total: {:.1} from {}/{} detectors",
            breakdown.summary.raw_total, breakdown.summary.signals_fired, breakdown.summary.detectors_run
        ));
        if breakdown.summary.raw_total > 100.0 {
            lines.push("- Clamped to 100".to_string());
        }

        lines.join("\n")
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
