//! Detector execution engine with parallel support
//!
//! The DetectorEngine runs every registered heuristic against one scoring
//! context and collects the signals that fired.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    DetectorEngine                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Register detectors (config decides which)           │
//! │  2. Evaluate all detectors in parallel (rayon)          │
//! │  3. Keep registration order in the output               │
//! │  4. Drop non-positive contributions                     │
//! │  5. Summarize what fired                                │
//! └─────────────────────────────────────────────────────────┘
//! ```

use crate::config::EngineConfig;
use crate::detectors::base::{DetectionSummary, Detector, DetectorResult, ScoringContext, Signal};
use crate::detectors::{
    BenfordDetector, DutySeparationDetector, IdentityConsistencyDetector,
    PatternDeviationDetector, RoundingDetector, VelocityDetector,
};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Orchestrates anomaly detection across all registered detectors
pub struct DetectorEngine {
    /// Registered detectors, in evaluation-report order
    detectors: Vec<Arc<dyn Detector>>,
    /// Evaluate detectors on the rayon pool instead of inline
    parallel: bool,
}

impl DetectorEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
            parallel: true,
        }
    }

    /// Create an engine with the built-in heuristics, honoring
    /// `[detectors.<name>] enabled = false` and per-detector thresholds.
    pub fn with_defaults(config: &EngineConfig) -> Self {
        let builtins: Vec<Arc<dyn Detector>> = vec![
            Arc::new(DutySeparationDetector::from_config(config)),
            Arc::new(VelocityDetector::from_config(config)),
            Arc::new(PatternDeviationDetector::from_config(config)),
            Arc::new(BenfordDetector::from_config(config)),
            Arc::new(IdentityConsistencyDetector::from_config(config)),
            Arc::new(RoundingDetector::from_config(config)),
        ];

        let mut engine = Self::new();
        for detector in builtins {
            if config.is_detector_enabled(detector.name()) {
                engine.register(detector);
            } else {
                debug!("Detector {} disabled by config", detector.name());
            }
        }
        engine
    }

    /// Run detectors inline on the calling thread
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Register a detector; it reports after all previously registered ones
    pub fn register(&mut self, detector: Arc<dyn Detector>) {
        debug!("Registering detector: {}", detector.name());
        self.detectors.push(detector);
    }

    pub fn register_all(&mut self, detectors: impl IntoIterator<Item = Arc<dyn Detector>>) {
        for detector in detectors {
            self.register(detector);
        }
    }

    pub fn detector_count(&self) -> usize {
        self.detectors.len()
    }

    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Registered detector called `name`, if any
    pub fn detector(&self, name: &str) -> Option<&dyn Detector> {
        self.detectors
            .iter()
            .find(|d| d.name() == name)
            .map(|d| d.as_ref())
    }

    /// Evaluate every detector against `ctx`.
    ///
    /// Returned signals follow registration order regardless of which
    /// thread finished first. Signals with a non-positive contribution
    /// are dropped so an explanation never lists a zero-weight factor.
    pub fn run(&self, ctx: &ScoringContext<'_>) -> (Vec<Signal>, DetectionSummary) {
        let start = Instant::now();

        let results: Vec<DetectorResult> = if self.parallel {
            self.detectors
                .par_iter()
                .map(|detector| run_single_detector(detector, ctx))
                .collect()
        } else {
            self.detectors
                .iter()
                .map(|detector| run_single_detector(detector, ctx))
                .collect()
        };

        let mut summary = DetectionSummary::default();
        let mut signals = Vec::new();
        for result in results {
            summary.add_result(&result);
            if let Some(signal) = result.signal {
                signals.push(signal);
            }
        }
        summary.duration_us = start.elapsed().as_micros() as u64;

        debug!(
            "Ran {} detectors, {} fired (raw total {:.2}) in {}us",
            summary.detectors_run, summary.signals_fired, summary.raw_total, summary.duration_us
        );

        (signals, summary)
    }
}

impl Default for DetectorEngine {
    fn default() -> Self {
        Self::with_defaults(&EngineConfig::default())
    }
}

/// Run a single detector, isolating panics
fn run_single_detector(detector: &Arc<dyn Detector>, ctx: &ScoringContext<'_>) -> DetectorResult {
    let name = detector.name();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| detector.evaluate(ctx)));

    let signal = match outcome {
        Ok(signal) => signal.filter(|s| s.contribution > 0.0),
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            error!("Detector {} panicked: {}", name, panic_msg);
            None
        }
    };

    if let Some(s) = &signal {
        debug!("Detector {} fired (+{:.2})", name, s.contribution);
    }

    DetectorResult {
        detector_name: name,
        signal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, TransactionRecord};

    struct MockDetector {
        name: &'static str,
        contribution: f64,
    }

    impl Detector for MockDetector {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "Mock detector for testing"
        }

        fn evaluate(&self, _ctx: &ScoringContext<'_>) -> Option<Signal> {
            Some(Signal::new(self.name, self.contribution, self.name))
        }
    }

    struct PanickingDetector;

    impl Detector for PanickingDetector {
        fn name(&self) -> &'static str {
            "panicky"
        }

        fn description(&self) -> &'static str {
            "Always panics"
        }

        fn evaluate(&self, _ctx: &ScoringContext<'_>) -> Option<Signal> {
            panic!("boom")
        }
    }

    fn mock(name: &'static str, contribution: f64) -> Arc<dyn Detector> {
        Arc::new(MockDetector { name, contribution })
    }

    #[test]
    fn test_default_registration_order() {
        let engine = DetectorEngine::default();
        assert_eq!(
            engine.detector_names(),
            vec![
                "duty-separation",
                "velocity",
                "pattern-deviation",
                "benford",
                "identity-consistency",
                "rounding"
            ]
        );
    }

    #[test]
    fn test_disabled_detector_not_registered() {
        let config = EngineConfig::from_toml_str("[detectors.rounding]\nenabled = false\n").unwrap();
        let engine = DetectorEngine::with_defaults(&config);
        assert_eq!(engine.detector_count(), 5);
        assert!(!engine.detector_names().contains(&"rounding"));
    }

    #[test]
    fn test_detector_lookup_by_name() {
        let engine = DetectorEngine::default();
        let velocity = engine.detector("velocity").unwrap();
        assert_eq!(velocity.category(), "behavioral");
        assert_eq!(
            velocity.description(),
            "Detects rapid repeated filings by the same entity"
        );
        assert_eq!(engine.detector("benford").unwrap().category(), "statistical");
        assert!(engine.detector("unknown").is_none());
    }

    #[test]
    fn test_run_preserves_order_and_drops_zero() {
        let mut engine = DetectorEngine::new();
        engine.register_all((0..32).map(|i| mock(if i % 2 == 0 { "even" } else { "odd" }, i as f64)));

        let candidate = TransactionRecord::new(Category::Welfare, "W-1", "Scheme", 1.0);
        let ctx = ScoringContext::new(&candidate, &[], None);
        let (signals, summary) = engine.run(&ctx);

        // i == 0 contributes nothing
        assert_eq!(signals.len(), 31);
        let contributions: Vec<f64> = signals.iter().map(|s| s.contribution).collect();
        let expected: Vec<f64> = (1..32).map(|i| i as f64).collect();
        assert_eq!(contributions, expected);
        assert_eq!(summary.detectors_run, 32);
        assert_eq!(summary.signals_fired, 31);
        assert_eq!(summary.raw_total, 496.0);
    }

    #[test]
    fn test_panicking_detector_is_isolated() {
        let mut engine = DetectorEngine::new().sequential();
        engine.register(Arc::new(PanickingDetector));
        engine.register(mock("ok", 10.0));

        let candidate = TransactionRecord::new(Category::Welfare, "W-1", "Scheme", 1.0);
        let ctx = ScoringContext::new(&candidate, &[], None);
        let (signals, summary) = engine.run(&ctx);

        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].detector, "ok");
        assert_eq!(summary.detectors_run, 2);
    }
}
