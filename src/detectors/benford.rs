//! Benford Digit-Frequency Detector
//!
//! Compares how often the candidate's leading digit appears among the
//! sector's historical amounts against Benford's expected probability.
//! One-sided: only an under-represented digit fires, since fabricated
//! figures tend to avoid the naturally dominant leading digits.

use crate::config::EngineConfig;
use crate::detectors::base::{Detector, ScoringContext, Signal};

const NAME: &str = "benford";

/// Benford's expected leading-digit probabilities for 1..=9
pub const BENFORD_EXPECTED: [f64; 9] = [0.301, 0.176, 0.125, 0.097, 0.079, 0.067, 0.058, 0.051, 0.046];

/// First nonzero digit of a positive finite amount
pub fn leading_digit(amount: f64) -> Option<u8> {
    if !amount.is_finite() || amount <= 0.0 {
        return None;
    }
    amount
        .to_string()
        .bytes()
        .find(|b| (b'1'..=b'9').contains(b))
        .map(|b| b - b'0')
}

pub struct BenfordDetector {
    min_history: usize,
    ratio: f64,
    weight: f64,
}

impl BenfordDetector {
    pub fn new() -> Self {
        Self {
            min_history: 15,
            ratio: 0.25,
            weight: 30.0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let defaults = Self::new();
        Self {
            min_history: config.threshold_usize(NAME, "min_history", defaults.min_history),
            ratio: config.threshold_f64(NAME, "ratio", defaults.ratio),
            weight: config.threshold_f64(NAME, "weight", defaults.weight),
        }
    }
}

impl Default for BenfordDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for BenfordDetector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Detects leading digits under-represented relative to Benford's Law"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        if ctx.category_amounts.len() < self.min_history {
            return None;
        }

        let digit = leading_digit(ctx.amount())?;
        let digits: Vec<u8> = ctx
            .category_amounts
            .iter()
            .filter_map(|a| leading_digit(*a))
            .collect();
        if digits.is_empty() {
            return None;
        }

        let observed = digits.iter().filter(|d| **d == digit).count() as f64 / digits.len() as f64;
        let expected = BENFORD_EXPECTED[(digit - 1) as usize];

        if observed >= expected * self.ratio {
            return None;
        }

        Some(Signal::new(
            NAME,
            self.weight,
            format!(
                "Benford mismatch: leading digit '{}' is statistically under-represented ({:.1}% vs expected {:.1}%), indicating potential data fabrication.",
                digit,
                observed * 100.0,
                expected * 100.0
            ),
        ))
    }
}
