use super::*;

#[test]
fn test_normalize_detector_name() {
    assert_eq!(normalize_detector_name("VelocityDetector"), "velocity");
    assert_eq!(
        normalize_detector_name("DutySeparationDetector"),
        "duty-separation"
    );
    assert_eq!(normalize_detector_name("duty_separation"), "duty-separation");
    assert_eq!(normalize_detector_name("pattern-deviation"), "pattern-deviation");
}

#[test]
fn test_threshold_value() {
    let int_val = ThresholdValue::Integer(42);
    assert_eq!(int_val.as_i64(), 42);
    assert_eq!(int_val.as_f64(), 42.0);

    let float_val = ThresholdValue::Float(2.5);
    assert_eq!(float_val.as_i64(), 2);
    assert_eq!(float_val.as_f64(), 2.5);
}

#[test]
fn test_default_config() {
    let config = EngineConfig::default();

    assert!(config.is_detector_enabled("velocity"));
    assert!(config.is_detector_enabled("unknown-detector"));
    assert_eq!(config.approval.threshold, 3);
    assert!(config.approval.warn_on_near);
    assert_eq!(config.approval.default_department, "Audit Oversight Unit");
    assert_eq!(config.alerts.warning_score, 50);
    assert_eq!(config.alerts.critical_score, 75);
    assert_eq!(config.service.latency_ms, 0);
    assert_eq!(config.service.timeout_ms, 5000);
    assert_eq!(config.service.max_append_retries, 3);
    assert_eq!(config.threshold_f64("velocity", "weight", 70.0), 70.0);
}

#[test]
fn test_parse_toml_config() {
    let toml = r#"
[detectors.velocity]
thresholds = { window = 20, min_repeats = 4 }

[detectors.rounding]
enabled = false

[detectors.benford]
thresholds = { ratio = 0.5 }

[approval]
threshold = 5
warn_on_near = false

[alerts]
warning_score = 40

[service]
latency_ms = 1500
"#;

    let config = EngineConfig::from_toml_str(toml).unwrap();

    assert!(!config.is_detector_enabled("rounding"));
    assert!(!config.is_detector_enabled("RoundingDetector"));
    assert!(config.is_detector_enabled("velocity"));
    assert_eq!(config.threshold_usize("velocity", "window", 10), 20);
    assert_eq!(config.threshold_usize("velocity", "min_repeats", 3), 4);
    assert_eq!(config.threshold_f64("benford", "ratio", 0.25), 0.5);
    assert_eq!(config.threshold_f64("benford", "weight", 30.0), 30.0);
    assert_eq!(config.approval.threshold, 5);
    assert!(!config.approval.warn_on_near);
    assert_eq!(config.alerts.warning_score, 40);
    assert_eq!(config.alerts.critical_score, 75);
    assert_eq!(config.service.latency_ms, 1500);
}

#[test]
fn test_snake_case_section_lookup() {
    let toml = r#"
[detectors.duty_separation]
thresholds = { weight = 90 }
"#;
    let config = EngineConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.threshold_f64("duty-separation", "weight", 80.0), 90.0);
}

#[test]
fn test_negative_usize_threshold_clamps() {
    let toml = r#"
[detectors.velocity]
thresholds = { window = -4 }
"#;
    let config = EngineConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.threshold_usize("velocity", "window", 10), 0);
}

#[test]
fn test_load_missing_dir_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_engine_config(dir.path());
    assert_eq!(config.approval.threshold, 3);
}

#[test]
fn test_load_invalid_toml_falls_back_to_json() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("fiscal-sentinel.toml"), "not = [valid").unwrap();
    std::fs::write(
        dir.path().join(".fiscal-sentinel.json"),
        r#"{"approval": {"threshold": 7}}"#,
    )
    .unwrap();

    let config = load_engine_config(dir.path());
    assert_eq!(config.approval.threshold, 7);
}
