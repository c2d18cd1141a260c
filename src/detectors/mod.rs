//! Anomaly detectors
//!
//! This module provides the detector framework and the built-in risk
//! heuristics applied to every submitted transaction.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DetectorEngine                          │
//! │  - Registers detectors enabled in config                    │
//! │  - Evaluates them in parallel (rayon), ordered output       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Detector Trait                         │
//! │  - name(): config section and report identifier             │
//! │  - evaluate(ctx): Option<Signal>                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              ▼               ▼               ▼
//! ┌──────────────────┐ ┌──────────────┐ ┌──────────────────┐
//! │ Governance       │ │ Statistical  │ │ Heuristic        │
//! │ (DutySeparation, │ │ (Pattern,    │ │ (Identity,       │
//! │  Velocity)       │ │  Benford)    │ │  Rounding)       │
//! └──────────────────┘ └──────────────┘ └──────────────────┘
//! ```
//!
//! # Contributions
//!
//! | Detector               | Points           |
//! |------------------------|------------------|
//! | `duty-separation`      | 80               |
//! | `velocity`             | 70               |
//! | `pattern-deviation`    | 40..=80, 50, 60  |
//! | `benford`              | 30               |
//! | `identity-consistency` | 60               |
//! | `rounding`             | 15               |
//!
//! # Usage
//!
//! ```ignore
//! use fiscal_sentinel::config::EngineConfig;
//! use fiscal_sentinel::detectors::{DetectorEngine, ScoringContext};
//!
//! let engine = DetectorEngine::with_defaults(&EngineConfig::default());
//! let ctx = ScoringContext::new(&candidate, &history, Some("J. Rao"));
//! let (signals, summary) = engine.run(&ctx);
//! ```

mod base;
mod benford;
mod duty_separation;
mod engine;
mod identity;
mod pattern_deviation;
mod rounding;
mod velocity;

pub use base::{DetectionSummary, Detector, DetectorResult, ScoringContext, Signal};
pub use benford::{leading_digit, BenfordDetector, BENFORD_EXPECTED};
pub use duty_separation::DutySeparationDetector;
pub use engine::DetectorEngine;
pub use identity::IdentityConsistencyDetector;
pub use pattern_deviation::PatternDeviationDetector;
pub use rounding::RoundingDetector;
pub use velocity::VelocityDetector;
