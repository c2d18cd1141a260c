//! Init command - write an example fiscal-sentinel.toml

use anyhow::{bail, Context, Result};
use console::style;
use std::path::Path;

const EXAMPLE_CONFIG: &str = r#"# Fiscal Sentinel configuration
# Every value below is the built-in default; delete what you don't change.

# Detectors can be disabled or tuned individually.
# Names accept kebab-case, snake_case or CamelCase.

[detectors.duty-separation]
enabled = true
thresholds = { weight = 80 }

[detectors.velocity]
enabled = true
# window = trailing history entries scanned, min_repeats = same-entity hits that fire
thresholds = { window = 10, min_repeats = 3, weight = 70 }

[detectors.pattern-deviation]
enabled = true
thresholds = { entity_min_history = 3, category_min_history = 5, category_z = 3.0, entity_z = 2.2, absolute_amount = 10000 }

[detectors.benford]
enabled = true
# fires when a leading digit is observed at under ratio * its expected frequency
thresholds = { min_history = 15, ratio = 0.25, weight = 30 }

[detectors.identity-consistency]
enabled = true
thresholds = { weight = 60 }

[detectors.rounding]
enabled = true
thresholds = { unit = 1000, weight = 15 }

[approval]
# approvals per officer before the review limit is breached
threshold = 3
# warn on the approval that reaches the limit, not only the one past it
warn_on_near = true
default_department = "Audit Oversight Unit"

[alerts]
warning_score = 50
critical_score = 75

[service]
# simulated analysis delay before scoring
latency_ms = 0
timeout_ms = 5000
max_append_retries = 3
# seed for the generated history corpus
seed = 42
"#;

pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join("fiscal-sentinel.toml");

    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    std::fs::write(&config_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\nNext steps:");
    println!("  {} Score a record", style("fiscal-sentinel score --help").cyan());
    println!("  {} Session dashboard", style("fiscal-sentinel summary").cyan());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiscal_sentinel::config::{load_engine_config, EngineConfig};

    #[test]
    fn test_example_config_parses_to_defaults() {
        let config = EngineConfig::from_toml_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.approval.threshold, 3);
        assert!(config.approval.warn_on_near);
        assert_eq!(config.service.seed, 42);
        assert_eq!(config.threshold_usize("velocity", "window", 0), 10);
        assert_eq!(config.threshold_f64("pattern-deviation", "category_z", 0.0), 3.0);
        assert!(config.is_detector_enabled("identity-consistency"));
    }

    #[test]
    fn test_init_writes_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), false).unwrap();

        let loaded = load_engine_config(dir.path());
        assert_eq!(loaded.alerts.critical_score, 75);

        assert!(run(dir.path(), false).is_err());
        assert!(run(dir.path(), true).is_ok());
    }
}
