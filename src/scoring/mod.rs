//! Composite Risk Scoring
//!
//! Combines the signals of every enabled detector into one bounded
//! score and a discrete risk level.
//!
//! # Scoring Formula
//!
//! ```text
//! raw    = Σ contribution  (fired detectors, unbounded)
//! score  = round(clamp(raw, 0, 100))
//! level  = CRITICAL if score ≥ 80
//!          HIGH     if score ≥ 55
//!          MEDIUM   if score ≥ 30
//!          LOW      otherwise
//! ```
//!
//! Contributions compound on purpose: two moderate signals together
//! outrank either one alone.
//!
//! # Factor Order
//!
//! `factors` lists the messages of fired detectors in evaluation order:
//! duty-separation, velocity, pattern-deviation, benford,
//! identity-consistency, rounding, then any custom detectors.

mod risk_scorer;

pub use risk_scorer::{clamp_score, RiskScorer, ScoreBreakdown};
