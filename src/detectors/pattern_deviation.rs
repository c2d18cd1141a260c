//! Pattern Deviation Detector
//!
//! Z-score outlier detection against the entity's own billing history,
//! falling back to the sector-wide baseline when the entity has too few
//! filings. Exactly one branch fires per call:
//!
//! ```text
//! entity history >= entity_min_history
//!   ├─ stddev == 0 and amount != mean  → static pattern broken (50)
//!   └─ z > entity_z or amount > abs    → 40 + min(z·5, 40)
//! otherwise, category history > category_min_history
//!   └─ z > category_z or amount > abs  → sector outlier (60)
//! ```
//!
//! The absolute amount trigger fires regardless of how normal the
//! amount is for that entity or sector.

use crate::config::EngineConfig;
use crate::detectors::base::{Detector, ScoringContext, Signal};
use crate::stats::{mean, stddev, z_score};

const NAME: &str = "pattern-deviation";

pub struct PatternDeviationDetector {
    entity_min_history: usize,
    category_min_history: usize,
    category_z: f64,
    entity_z: f64,
    absolute_amount: f64,
    category_weight: f64,
    static_weight: f64,
    entity_base_weight: f64,
    entity_z_multiplier: f64,
    entity_max_bonus: f64,
}

impl PatternDeviationDetector {
    pub fn new() -> Self {
        Self {
            entity_min_history: 3,
            category_min_history: 5,
            category_z: 3.0,
            entity_z: 2.2,
            absolute_amount: 10_000.0,
            category_weight: 60.0,
            static_weight: 50.0,
            entity_base_weight: 40.0,
            entity_z_multiplier: 5.0,
            entity_max_bonus: 40.0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let d = Self::new();
        Self {
            entity_min_history: config.threshold_usize(NAME, "entity_min_history", d.entity_min_history),
            category_min_history: config.threshold_usize(NAME, "category_min_history", d.category_min_history),
            category_z: config.threshold_f64(NAME, "category_z", d.category_z),
            entity_z: config.threshold_f64(NAME, "entity_z", d.entity_z),
            absolute_amount: config.threshold_f64(NAME, "absolute_amount", d.absolute_amount),
            category_weight: config.threshold_f64(NAME, "category_weight", d.category_weight),
            static_weight: config.threshold_f64(NAME, "static_weight", d.static_weight),
            entity_base_weight: config.threshold_f64(NAME, "entity_base_weight", d.entity_base_weight),
            entity_z_multiplier: config.threshold_f64(NAME, "entity_z_multiplier", d.entity_z_multiplier),
            entity_max_bonus: config.threshold_f64(NAME, "entity_max_bonus", d.entity_max_bonus),
        }
    }

    /// Sector-wide fallback when the entity has too little history
    fn check_category(&self, amount: f64, category_amounts: &[f64]) -> Option<Signal> {
        if category_amounts.len() <= self.category_min_history {
            return None;
        }

        let z = z_score(amount, mean(category_amounts), stddev(category_amounts));
        if z > self.category_z || amount > self.absolute_amount {
            return Some(Signal::new(
                NAME,
                self.category_weight,
                "Category outlier: this amount deviates significantly from the sector baseline.",
            ));
        }
        None
    }

    fn check_entity(&self, amount: f64, entity_amounts: &[f64]) -> Option<Signal> {
        let avg = mean(entity_amounts);
        let sdev = stddev(entity_amounts);

        if sdev == 0.0 && amount != avg {
            return Some(Signal::new(
                NAME,
                self.static_weight,
                "Contractual deviation: previously static billing pattern broken. This change lacks historical precedent.",
            ));
        }

        let z = z_score(amount, avg, sdev);
        if z > self.entity_z || amount > self.absolute_amount {
            let contribution =
                self.entity_base_weight + (z * self.entity_z_multiplier).min(self.entity_max_bonus);
            return Some(Signal::new(
                NAME,
                contribution,
                format!(
                    "Entity-level outlier: amount is {:.1} standard deviations from this entity's historical baseline.",
                    z
                ),
            ));
        }
        None
    }
}

impl Default for PatternDeviationDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for PatternDeviationDetector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Detects amounts that deviate from the entity's or sector's historical baseline"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        if ctx.entity_amounts.len() < self.entity_min_history {
            self.check_category(ctx.amount(), &ctx.category_amounts)
        } else {
            self.check_entity(ctx.amount(), &ctx.entity_amounts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, HistoryEntry, RiskAnalysisResult, TransactionRecord};

    fn history(category: Category, rows: &[(&str, f64)]) -> Vec<HistoryEntry> {
        rows.iter()
            .map(|(id, amount)| {
                HistoryEntry::new(
                    TransactionRecord::new(category, *id, "Entity", *amount),
                    RiskAnalysisResult::baseline(0),
                    None,
                )
            })
            .collect()
    }

    fn evaluate(history: &[HistoryEntry], id: &str, amount: f64) -> Option<Signal> {
        let candidate = TransactionRecord::new(Category::Education, id, "Entity", amount);
        let ctx = ScoringContext::new(&candidate, history, None);
        PatternDeviationDetector::new().evaluate(&ctx)
    }

    #[test]
    fn test_static_billing_broken() {
        let h = history(Category::Education, &[("U-1", 5000.0), ("U-1", 5000.0), ("U-1", 5000.0)]);
        let signal = evaluate(&h, "U-1", 5200.0).unwrap();
        assert_eq!(signal.contribution, 50.0);
        assert!(signal.message.contains("static billing pattern broken"));

        assert!(evaluate(&h, "U-1", 5000.0).is_none());
    }

    #[test]
    fn test_entity_outlier_scales_with_z() {
        // mean 1000, population stddev ~81.6
        let h = history(Category::Education, &[("U-1", 900.0), ("U-1", 1000.0), ("U-1", 1100.0)]);

        // z ≈ 2.45 -> 40 + 12.25
        let signal = evaluate(&h, "U-1", 1200.0).unwrap();
        assert!(signal.contribution > 52.0 && signal.contribution < 53.0);
        assert!(signal.message.contains("Entity-level outlier"));

        // huge z saturates at 80
        let signal = evaluate(&h, "U-1", 9000.0).unwrap();
        assert_eq!(signal.contribution, 80.0);

        // within band
        assert!(evaluate(&h, "U-1", 1050.0).is_none());
    }

    #[test]
    fn test_entity_absolute_threshold() {
        let h = history(Category::Education, &[("U-1", 20000.0), ("U-1", 21000.0), ("U-1", 22000.0)]);
        let signal = evaluate(&h, "U-1", 21000.0).unwrap();
        assert_eq!(signal.contribution, 40.0);
    }

    #[test]
    fn test_category_fallback() {
        let rows: Vec<(&str, f64)> = (0..6).map(|i| ("OTHER", 1000.0 + i as f64 * 10.0)).collect();
        let h = history(Category::Education, &rows);

        let signal = evaluate(&h, "NEW", 9000.0).unwrap();
        assert_eq!(signal.contribution, 60.0);
        assert!(signal.message.contains("Category outlier"));

        assert!(evaluate(&h, "NEW", 1020.0).is_none());
        // absolute floor applies even with a tiny z
        let signal = evaluate(&h, "NEW", 10_001.0).unwrap();
        assert_eq!(signal.contribution, 60.0);
    }

    #[test]
    fn test_thin_category_is_silent() {
        let rows: Vec<(&str, f64)> = (0..5).map(|_| ("OTHER", 100.0)).collect();
        let h = history(Category::Education, &rows);
        assert!(evaluate(&h, "NEW", 1_000_000.0).is_none());
    }

    #[test]
    fn test_other_category_ignored() {
        let rows: Vec<(&str, f64)> = (0..10).map(|_| ("U-1", 100.0)).collect();
        let h = history(Category::Defence, &rows);
        assert!(evaluate(&h, "U-1", 1_000_000.0).is_none());
    }
}
