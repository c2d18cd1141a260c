//! Duty Separation Detector
//!
//! Flags an approving officer who has already authorized another
//! transaction anywhere in the observed history. Category and entity
//! do not matter: the same individual signing off repeatedly within a
//! session is the collusion signal.

use crate::config::EngineConfig;
use crate::detectors::base::{Detector, ScoringContext, Signal};
use tracing::debug;

const NAME: &str = "duty-separation";

pub struct DutySeparationDetector {
    weight: f64,
}

impl DutySeparationDetector {
    pub fn new() -> Self {
        Self { weight: 80.0 }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let defaults = Self::new();
        Self {
            weight: config.threshold_f64(NAME, "weight", defaults.weight),
        }
    }
}

impl Default for DutySeparationDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for DutySeparationDetector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Detects officers approving more than one transaction in a session"
    }

    fn category(&self) -> &'static str {
        "governance"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let officer = ctx.officer?;
        let normalized = ctx.normalized_officer()?;

        let prior = ctx.history.iter().filter(|h| h.approved_by(&normalized)).count();
        if prior == 0 {
            return None;
        }

        debug!("{} prior approvals by '{}' in history", prior, officer);
        Some(Signal::new(
            NAME,
            self.weight,
            format!(
                "Duty separation violation: officer \"{}\" has previously authorized transactions in this session. High risk of collusion.",
                officer.trim()
            ),
        ))
    }
}
