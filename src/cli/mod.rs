//! CLI command definitions and handlers

mod init;
mod records;
mod score;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fiscal_sentinel::config::{load_engine_config, EngineConfig};
use fiscal_sentinel::history::{seed_history, HistoryLog, SessionStore};
use fiscal_sentinel::service::AuditService;
use std::path::{Path, PathBuf};

/// Fiscal Sentinel - audit risk scoring for public expenditure records
#[derive(Parser, Debug)]
#[command(name = "fiscal-sentinel")]
#[command(
    version,
    about = "Heuristic fraud and anomaly scoring for government expenditure audit records",
    long_about = "Fiscal Sentinel scores each submitted expenditure record against the \
audit history using six independent detectors (duty separation, velocity, \
pattern deviation, Benford's law, identity consistency and rounding) and \
produces a 0-100 risk score with human-readable factors.\n\n\
Approvals are counted per officer; officers who approve too often are flagged.",
    after_help = "\
Examples:
  fiscal-sentinel init                                      Write an example fiscal-sentinel.toml
  fiscal-sentinel score --category healthcare --entity-id HID-1 \\
      --entity-name Apollo --amount 9000000                 Score one record
  fiscal-sentinel score --batch claims.json --format json   Score a batch, JSON output
  fiscal-sentinel find hist-hc-3                            Look up a record
  fiscal-sentinel summary                                   Session dashboard"
)]
pub struct Cli {
    /// Directory containing fiscal-sentinel.toml (default: current directory)
    #[arg(long, global = true, default_value = ".")]
    pub config: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a fiscal-sentinel.toml config file with example settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Score one record, a record from a JSON file, or a batch
    #[command(after_help = "\
Examples:
  fiscal-sentinel score --category taxation --entity-id GST-77 --entity-name \"Acme Traders\" \\
      --amount 12000 --officer \"J. Rao\" --department Finance
  fiscal-sentinel score --input record.json
  fiscal-sentinel score --batch records.json --no-seed --format json
  fiscal-sentinel score --category welfare --entity-id W-1 --entity-name Scheme \\
      --amount 5000 --dry-run

Categories: healthcare, education, defence, taxation, tenders, payroll, foreign-aid, welfare")]
    Score {
        /// Sector: healthcare, education, defence, taxation, tenders, payroll, foreign-aid, welfare
        #[arg(long)]
        category: Option<String>,

        /// Registration ID of the beneficiary or vendor
        #[arg(long)]
        entity_id: Option<String>,

        /// Name of the beneficiary or vendor
        #[arg(long)]
        entity_name: Option<String>,

        /// Amount as entered (free text, e.g. "12000" or "12000 INR")
        #[arg(long)]
        amount: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        reason: Option<String>,

        /// Transaction date as entered
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        sub_category: Option<String>,

        /// Approving officer (omit for an unattributed submission)
        #[arg(long)]
        officer: Option<String>,

        /// Approving officer's department (default from config)
        #[arg(long)]
        department: Option<String>,

        /// Read a single record from a JSON file
        #[arg(long, conflicts_with_all = ["batch", "category", "entity_id", "entity_name", "amount"])]
        input: Option<PathBuf>,

        /// Read an array of records from a JSON file, scored in order
        #[arg(long, conflicts_with_all = ["input", "category", "entity_id", "entity_name", "amount"])]
        batch: Option<PathBuf>,

        /// Session file (JSONL) to restore from and append to
        #[arg(long)]
        session: Option<PathBuf>,

        /// Start from an empty history instead of the seed corpus
        #[arg(long)]
        no_seed: bool,

        /// Show the score breakdown without approving or recording anything
        #[arg(long, conflicts_with = "batch")]
        dry_run: bool,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text")]
        format: String,
    },

    /// Look up a seed or session record by ID
    Find {
        /// Record ID (case-insensitive)
        id: String,

        /// Session file (JSONL) to search
        #[arg(long)]
        session: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text")]
        format: String,
    },

    /// Session dashboard: totals, high-risk exposure, per-sector scores
    Summary {
        /// Session file (JSONL) to summarize
        #[arg(long)]
        session: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text")]
        format: String,
    },

    /// Dump the seed history corpus as JSON
    Seed {
        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let config = load_engine_config(&cli.config);

    match cli.command {
        Commands::Init { force } => init::run(&cli.config, force),

        Commands::Score {
            category,
            entity_id,
            entity_name,
            amount,
            location,
            reason,
            date,
            sub_category,
            officer,
            department,
            input,
            batch,
            session,
            no_seed,
            dry_run,
            format,
        } => {
            let source = if let Some(path) = batch {
                score::Source::Batch(path)
            } else if let Some(path) = input {
                score::Source::Input(path)
            } else {
                score::Source::Flags(score::RecordFlags {
                    category,
                    entity_id,
                    entity_name,
                    amount,
                    location,
                    reason,
                    date,
                    sub_category,
                })
            };
            let officer = score::OfficerFlags { officer, department };
            let service = open_service(&config, session.as_deref(), !no_seed)?;
            score::run(&service, &config, source, officer, dry_run, &format)
        }

        Commands::Find {
            id,
            session,
            format,
        } => {
            let service = open_service(&config, session.as_deref(), true)?;
            records::find(&service, &id, &format)
        }

        Commands::Summary { session, format } => {
            let service = open_service(&config, session.as_deref(), false)?;
            records::summary(&service, &format)
        }

        Commands::Seed { output } => records::seed(&config, output.as_deref()),
    }
}

/// Build the service over seed + persisted session history
fn open_service(config: &EngineConfig, session: Option<&Path>, seeded: bool) -> Result<AuditService> {
    let history = if seeded {
        HistoryLog::with_seed(seed_history(config.service.seed))
    } else {
        HistoryLog::new()
    };

    let store = match session {
        Some(path) => SessionStore::with_path(path),
        None => SessionStore::new(),
    };
    let path = store.data_path().to_path_buf();

    let service = AuditService::new(config, history).with_session_store(store);
    service
        .restore()
        .with_context(|| format!("Failed to restore session from {}", path.display()))?;
    Ok(service)
}
