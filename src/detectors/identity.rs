//! Identity Consistency Detector
//!
//! An entity identifier is registered to one declared name. A candidate
//! reusing a same-sector identifier under a different name (compared
//! trimmed and case-insensitively) is flagged; the first conflicting
//! entry on file is reported.

use crate::config::EngineConfig;
use crate::detectors::base::{Detector, ScoringContext, Signal};
use crate::models::normalize_name;

const NAME: &str = "identity-consistency";

pub struct IdentityConsistencyDetector {
    weight: f64,
}

impl IdentityConsistencyDetector {
    pub fn new() -> Self {
        Self { weight: 60.0 }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            weight: config.threshold_f64(NAME, "weight", Self::new().weight),
        }
    }
}

impl Default for IdentityConsistencyDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for IdentityConsistencyDetector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Detects an entity ID bound to a different name in history"
    }

    fn category(&self) -> &'static str {
        "identity"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Signal> {
        let candidate = ctx.candidate;
        let submitted = normalize_name(&candidate.entity_name);

        let conflict = ctx.category_history.iter().find(|h| {
            h.input.entity_id == candidate.entity_id && normalize_name(&h.input.entity_name) != submitted
        })?;

        Some(Signal::new(
            NAME,
            self.weight,
            format!(
                "Identity conflict: registration ID {} is linked to \"{}\" in master records, mismatching submitted name \"{}\".",
                candidate.entity_id, conflict.input.entity_name, candidate.entity_name
            ),
        ))
    }
}
