//! Velocity Detector
//!
//! Counts how many of the most recent history entries (any category)
//! were filed by the candidate's entity. A burst of filings inside the
//! recency window is the classic claim-splitting pattern. Only the window
//! counts, so long-standing repeat filers are not flagged forever.

use crate::config::EngineConfig;
use crate::detectors::base::{Detector, ScoringContext, Signal};
use crate::models::HistoryEntry;

const NAME: &str = "velocity";

pub struct VelocityDetector {
    window: usize,
    min_repeats: usize,
    weight: f64,
}

impl VelocityDetector {
    pub fn new() -> Self {
        Self {
            window: 10,
            min_repeats: 3,
            weight: 70.0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let defaults = Self::new();
        Self {
            window: config.threshold_usize(NAME, "window", defaults.window),
            min_repeats: config.threshold_usize(NAME, "min_repeats", defaults.min_repeats),
            weight: config.threshold_f64(NAME, "weight", defaults.weight),
        }
    }

    /// Filings by `entity_id` among the `window` most recent entries
    fn recent_count(&self, entity_id: &str, history: &[HistoryEntry]) -> usize {
        let mut recent: Vec<&HistoryEntry> = history.iter().collect();
        // stable: equal timestamps keep their log order
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent
            .into_iter()
            .take(self.window)
            .filter(|h| h.input.entity_id == entity_id)
            .count()
    }
}

impl Default for VelocityDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for VelocityDetector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Detects rapid repeated filings by the same entity"
    }

    fn category(&self) -> &'static str {
        "behavioral"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let count = self.recent_count(&ctx.candidate.entity_id, ctx.history);
        if count < self.min_repeats.max(1) {
            return None;
        }

        Some(Signal::new(
            NAME,
            self.weight,
            format!(
                "High-frequency stacking: entity {} has filed {} transactions in a short sequence. This velocity pattern is a primary indicator of claim-splitting or automated padding.",
                ctx.candidate.entity_id,
                count + 1
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, RiskAnalysisResult, TransactionRecord};
    use chrono::{Duration, Utc};

    fn entry(id: &str, minutes_ago: i64) -> HistoryEntry {
        HistoryEntry::new(
            TransactionRecord::new(Category::Healthcare, id, "Entity", 1234.0),
            RiskAnalysisResult::baseline(0),
            None,
        )
        .with_date(Utc::now() - Duration::minutes(minutes_ago))
    }

    fn history_with_repeats(repeats: usize) -> Vec<HistoryEntry> {
        let mut history: Vec<HistoryEntry> = (0..repeats).map(|i| entry("HID-7", i as i64)).collect();
        for i in repeats..10 {
            history.push(entry(&format!("OTHER-{i}"), i as i64));
        }
        history
    }

    #[test]
    fn test_two_recent_filings_do_not_fire() {
        let history = history_with_repeats(2);
        let candidate = TransactionRecord::new(Category::Healthcare, "HID-7", "Entity", 99.0);
        let ctx = ScoringContext::new(&candidate, &history, None);
        assert!(VelocityDetector::new().evaluate(&ctx).is_none());
    }

    #[test]
    fn test_three_recent_filings_fire() {
        let history = history_with_repeats(3);
        let candidate = TransactionRecord::new(Category::Healthcare, "HID-7", "Entity", 99.0);
        let ctx = ScoringContext::new(&candidate, &history, None);

        let signal = VelocityDetector::new().evaluate(&ctx).unwrap();
        assert_eq!(signal.contribution, 70.0);
        assert!(signal.message.contains("High-frequency stacking"));
        assert!(signal.message.contains("filed 4 transactions"));
    }

    #[test]
    fn test_old_filings_outside_window_ignored() {
        // three old filings pushed out by ten newer ones
        let mut history: Vec<HistoryEntry> = (0..3).map(|i| entry("HID-7", 1000 + i)).collect();
        for i in 0..10 {
            history.push(entry(&format!("OTHER-{i}"), i));
        }
        let candidate = TransactionRecord::new(Category::Healthcare, "HID-7", "Entity", 99.0);
        let ctx = ScoringContext::new(&candidate, &history, None);
        assert!(VelocityDetector::new().evaluate(&ctx).is_none());
    }

    #[test]
    fn test_counts_across_categories() {
        let mut history = history_with_repeats(0);
        for i in 0..3 {
            let mut e = entry("HID-7", i);
            e.input.category = Category::Welfare;
            history.push(e);
        }
        let candidate = TransactionRecord::new(Category::Healthcare, "HID-7", "Entity", 99.0);
        let ctx = ScoringContext::new(&candidate, &history, None);
        assert!(VelocityDetector::new().evaluate(&ctx).is_some());
    }
}
