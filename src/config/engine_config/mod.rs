//! Engine configuration support
//!
//! Loads engine configuration from `fiscal-sentinel.toml` or
//! `.fiscal-sentinel.json` in the given directory.
//!
//! # Configuration Format
//!
//! ```toml
//! # fiscal-sentinel.toml
//!
//! [detectors.velocity]
//! enabled = true
//! thresholds = { window = 10, min_repeats = 3, weight = 70 }
//!
//! [detectors.rounding]
//! enabled = false
//!
//! [approval]
//! threshold = 3
//! default_department = "Audit Oversight Unit"
//!
//! [alerts]
//! warning_score = 50
//! critical_score = 75
//!
//! [service]
//! latency_ms = 0
//! timeout_ms = 5000
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// File names searched by [`load_engine_config`], in order
pub const CONFIG_FILE_NAMES: &[&str] = &["fiscal-sentinel.toml", ".fiscal-sentinel.json"];

/// Engine configuration loaded from fiscal-sentinel.toml or similar
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EngineConfig {
    /// Per-detector configuration overrides
    #[serde(default)]
    pub detectors: HashMap<String, DetectorConfigOverride>,

    /// Approval threshold tracking
    #[serde(default)]
    pub approval: ApprovalConfig,

    /// Notification thresholds for the collaborator
    #[serde(default)]
    pub alerts: AlertConfig,

    /// Session service behaviour
    #[serde(default)]
    pub service: ServiceConfig,
}

/// Configuration override for a specific detector
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DetectorConfigOverride {
    /// Whether the detector is enabled (default: true)
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Detector-specific threshold overrides
    /// Keys depend on the detector (e.g., window, min_history, weight)
    #[serde(default)]
    pub thresholds: HashMap<String, ThresholdValue>,
}

/// A threshold value can be an integer or a float
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ThresholdValue {
    Integer(i64),
    Float(f64),
}

impl ThresholdValue {
    /// Get as i64 (floats are truncated)
    pub fn as_i64(&self) -> i64 {
        match self {
            ThresholdValue::Integer(v) => *v,
            ThresholdValue::Float(v) => *v as i64,
        }
    }

    /// Get as f64
    pub fn as_f64(&self) -> f64 {
        match self {
            ThresholdValue::Integer(v) => *v as f64,
            ThresholdValue::Float(v) => *v,
        }
    }
}

/// Approval threshold tracking
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalConfig {
    /// Approvals per officer before a compliance warning (default: 3)
    #[serde(default = "default_approval_threshold")]
    pub threshold: u64,

    /// Raise `threshold_warning` once an officer is one approval short of
    /// the threshold. When false, only counts already at the threshold warn.
    #[serde(default = "default_warn_on_near")]
    pub warn_on_near: bool,

    /// Department recorded when the caller does not name one
    #[serde(default = "default_department")]
    pub default_department: String,
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            threshold: default_approval_threshold(),
            warn_on_near: default_warn_on_near(),
            default_department: default_department(),
        }
    }
}

fn default_approval_threshold() -> u64 {
    3
}
fn default_warn_on_near() -> bool {
    true
}
fn default_department() -> String {
    "Audit Oversight Unit".to_string()
}

/// Score thresholds that raise collaborator alerts
#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// Score at or above which a WARNING alert is raised (default: 50)
    #[serde(default = "default_warning_score")]
    pub warning_score: u8,

    /// Score at or above which the alert escalates to CRITICAL (default: 75)
    #[serde(default = "default_critical_score")]
    pub critical_score: u8,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            warning_score: default_warning_score(),
            critical_score: default_critical_score(),
        }
    }
}

fn default_warning_score() -> u8 {
    50
}
fn default_critical_score() -> u8 {
    75
}

/// Session service behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Artificial latency before scoring, in milliseconds (default: 0)
    #[serde(default)]
    pub latency_ms: u64,

    /// Whole-call deadline for one scoring request (default: 5000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Rescoring attempts when a concurrent append wins the race (default: 3)
    #[serde(default = "default_max_append_retries")]
    pub max_append_retries: usize,

    /// RNG seed for the built-in seed corpus (default: 42)
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            latency_ms: 0,
            timeout_ms: default_timeout_ms(),
            max_append_retries: default_max_append_retries(),
            seed: default_seed(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    5000
}
fn default_max_append_retries() -> usize {
    3
}
fn default_seed() -> u64 {
    42
}

/// Load engine configuration from a directory.
///
/// Searches for `fiscal-sentinel.toml`, then `.fiscal-sentinel.json`.
/// Returns default configuration if no config file is found or a file
/// fails to parse.
pub fn load_engine_config(dir: &Path) -> EngineConfig {
    let toml_path = dir.join(CONFIG_FILE_NAMES[0]);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded engine config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = dir.join(CONFIG_FILE_NAMES[1]);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded engine config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No engine config found, using defaults");
    EngineConfig::default()
}

fn load_toml_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let content = std::fs::read_to_string(path)?;
    EngineConfig::from_toml_str(&content)
}

fn load_json_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: EngineConfig = serde_json::from_str(&content)?;
    Ok(config)
}

impl EngineConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        Ok(config)
    }

    fn detector_override(&self, name: &str) -> Option<&DetectorConfigOverride> {
        let normalized = normalize_detector_name(name);
        self.detectors
            .get(&normalized)
            .or_else(|| self.detectors.get(name))
            .or_else(|| {
                self.detectors
                    .iter()
                    .find(|(key, _)| normalize_detector_name(key) == normalized)
                    .map(|(_, c)| c)
            })
    }

    /// Check if a detector is enabled (defaults to true if not specified)
    pub fn is_detector_enabled(&self, name: &str) -> bool {
        self.detector_override(name)
            .and_then(|c| c.enabled)
            .unwrap_or(true)
    }

    /// Threshold value for a detector
    pub fn threshold(&self, detector_name: &str, threshold_name: &str) -> Option<&ThresholdValue> {
        self.detector_override(detector_name)
            .and_then(|c| c.thresholds.get(threshold_name))
    }

    /// Threshold as f64, falling back to `default`
    pub fn threshold_f64(&self, detector_name: &str, threshold_name: &str, default: f64) -> f64 {
        self.threshold(detector_name, threshold_name)
            .map(ThresholdValue::as_f64)
            .unwrap_or(default)
    }

    /// Threshold as usize, falling back to `default` (negative values clamp to 0)
    pub fn threshold_usize(&self, detector_name: &str, threshold_name: &str, default: usize) -> usize {
        self.threshold(detector_name, threshold_name)
            .map(ThresholdValue::as_i64)
            .map(|v| v.max(0) as usize)
            .unwrap_or(default)
    }
}

/// Normalize detector name for config lookup
/// Converts various formats to kebab-case for matching
pub fn normalize_detector_name(name: &str) -> String {
    // VelocityDetector -> velocity
    // DutySeparationDetector -> duty-separation
    // duty_separation -> duty-separation

    let mut result = String::new();
    let chars: Vec<char> = name.trim().chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_is_lower = i > 0 && chars[i - 1].is_lowercase();
            let is_acronym_end = i > 0
                && chars[i - 1].is_uppercase()
                && i + 1 < chars.len()
                && chars[i + 1].is_lowercase();

            if prev_is_lower || is_acronym_end {
                result.push('-');
            }
            result.extend(c.to_lowercase());
        } else if *c == '_' || *c == ' ' {
            result.push('-');
        } else {
            result.push(*c);
        }
    }

    result.trim_end_matches("-detector").to_string()
}

#[cfg(test)]
mod tests;
