//! Rounding Detector
//!
//! Perfectly round amounts are disproportionately likely to be entered
//! by hand. A weak prior that applies regardless of history.

use crate::config::EngineConfig;
use crate::detectors::base::{Detector, ScoringContext, Signal};

const NAME: &str = "rounding";

pub struct RoundingDetector {
    unit: f64,
    weight: f64,
}

impl RoundingDetector {
    pub fn new() -> Self {
        Self {
            unit: 1000.0,
            weight: 15.0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let defaults = Self::new();
        Self {
            unit: config.threshold_f64(NAME, "unit", defaults.unit),
            weight: config.threshold_f64(NAME, "weight", defaults.weight),
        }
    }
}

impl Default for RoundingDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for RoundingDetector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Detects suspiciously round amounts"
    }

    fn category(&self) -> &'static str {
        "heuristic"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let amount = ctx.amount();
        if self.unit <= 0.0 || amount <= 0.0 || amount % self.unit != 0.0 {
            return None;
        }

        Some(Signal::new(
            NAME,
            self.weight,
            "Heuristic warning: perfectly rounded amounts are statistically significant markers for manually inflated entries.",
        ))
    }
}
