//! Find, summary and seed commands

use anyhow::{Context, Result};
use console::style;
use fiscal_sentinel::alerts::search_alert;
use fiscal_sentinel::config::EngineConfig;
use fiscal_sentinel::history::seed_history;
use fiscal_sentinel::reporters::{self, OutputFormat};
use fiscal_sentinel::service::AuditService;
use std::path::Path;

pub fn find(service: &AuditService, id: &str, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let found = service.find(id);
    let alert = search_alert(id.trim(), found.is_some());

    match (found, format) {
        (Some(entry), format) => {
            if format == OutputFormat::Text {
                println!("{} {}", style("✓").green(), alert.message);
            }
            println!("{}", reporters::render_entry(&entry, format)?);
        }
        (None, OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&alert)?);
        }
        (None, OutputFormat::Text) => {
            println!("{} {}", style(&alert.title).yellow().bold(), alert.message);
        }
    }
    Ok(())
}

pub fn summary(service: &AuditService, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    println!("{}", reporters::render_summary(&service.summary(), format)?);
    Ok(())
}

pub fn seed(config: &EngineConfig, output: Option<&Path>) -> Result<()> {
    let entries = seed_history(config.service.seed);
    let json = serde_json::to_string_pretty(&entries)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} Wrote {} seed records to {}",
                style("✓").green(),
                entries.len(),
                style(path.display()).cyan()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
