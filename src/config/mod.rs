//! Configuration module for fiscal-sentinel
//!
//! This module handles:
//! - Engine configuration (fiscal-sentinel.toml)
//! - Detector enable/disable and threshold overrides
//! - Approval, alert and service settings

mod engine_config;

pub use engine_config::{
    load_engine_config, normalize_detector_name, AlertConfig, ApprovalConfig,
    DetectorConfigOverride, EngineConfig, ServiceConfig, ThresholdValue, CONFIG_FILE_NAMES,
};
