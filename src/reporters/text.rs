//! Text (terminal) reporter with colors and formatting

use crate::alerts::AlertSeverity;
use crate::models::{HistoryEntry, RiskLevel};
use crate::service::AuditOutcome;
use crate::summary::{format_currency, SessionSummary};

/// Risk level colors (ANSI escape codes)
fn level_color(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => "\x1b[31m", // Red
        RiskLevel::High => "\x1b[91m",     // Light red
        RiskLevel::Medium => "\x1b[33m",   // Yellow
        RiskLevel::Low => "\x1b[32m",      // Green
    }
}

fn alert_color(severity: AlertSeverity) -> &'static str {
    match severity {
        AlertSeverity::Critical => "\x1b[31m",
        AlertSeverity::Warning => "\x1b[33m",
        AlertSeverity::Info => "\x1b[34m",
    }
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

fn push_entry(out: &mut String, entry: &HistoryEntry) {
    let input = &entry.input;
    let analysis = &entry.analysis;
    let level_c = level_color(analysis.level);

    out.push_str(&format!("\n{BOLD}Audit {}{RESET}\n", entry.id));
    out.push_str(&format!("{DIM}──────────────────────────────────────{RESET}\n"));
    out.push_str(&format!(
        "Score: {BOLD}{}/100{RESET}  Level: {level_c}{BOLD}{}{RESET}\n",
        analysis.score, analysis.level
    ));
    out.push_str(&format!(
        "Entity: {} ({})  Sector: {}  Amount: {}\n",
        input.entity_name,
        input.entity_id,
        input.category.title(),
        format_currency(input.amount)
    ));
    if let Some(approval) = &entry.approval {
        let flag = if approval.threshold_warning {
            format!("  \x1b[31mthreshold warning{RESET}")
        } else {
            String::new()
        };
        out.push_str(&format!(
            "Approved by: {} ({}), approval #{}{}\n",
            approval.approver_name, approval.approver_dept, approval.approval_count, flag
        ));
    }
}

fn push_factors(out: &mut String, entry: &HistoryEntry, contributions: Option<&[f64]>) {
    out.push_str(&format!("\n{BOLD}FACTORS{RESET} ({})\n", entry.analysis.factors.len()));
    if entry.analysis.factors.is_empty() {
        out.push_str(&format!("  {DIM}No anomaly signals{RESET}\n"));
        return;
    }
    for (i, factor) in entry.analysis.factors.iter().enumerate() {
        match contributions.and_then(|c| c.get(i)) {
            Some(points) => out.push_str(&format!("  {DIM}+{:>4.1}{RESET}  {}\n", points, factor)),
            None => out.push_str(&format!("  - {}\n", factor)),
        }
    }
}

/// Render submission outcomes as formatted terminal output
pub fn render_outcomes(outcomes: &[AuditOutcome]) -> String {
    let mut out = String::new();

    for outcome in outcomes {
        let contributions: Vec<f64> = outcome.signals.iter().map(|s| s.contribution).collect();
        push_entry(&mut out, &outcome.entry);
        push_factors(&mut out, &outcome.entry, Some(&contributions));

        if !outcome.alerts.is_empty() {
            out.push_str(&format!("\n{BOLD}ALERTS{RESET}\n"));
            for alert in &outcome.alerts {
                let c = alert_color(alert.severity);
                out.push_str(&format!(
                    "  {c}[{}]{RESET} {BOLD}{}{RESET}\n        {}\n",
                    alert.severity, alert.title, alert.message
                ));
            }
        }
    }

    out
}

/// Render a stored entry
pub fn render_entry(entry: &HistoryEntry) -> String {
    let mut out = String::new();
    push_entry(&mut out, entry);
    push_factors(&mut out, entry, None);
    out
}

/// Render the session dashboard
pub fn render_summary(summary: &SessionSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}Session Summary{RESET}\n"));
    out.push_str(&format!("{DIM}──────────────────────────────────────{RESET}\n"));
    out.push_str(&format!(
        "Total audited: {BOLD}{}{RESET}  Reports: {}\n",
        format_currency(summary.total_audited),
        summary.report_count
    ));
    out.push_str(&format!(
        "High risk flagged: \x1b[31m{}{RESET} ({} cases)\n\n",
        format_currency(summary.high_risk_amount),
        summary.high_risk_count
    ));

    out.push_str(&format!("{DIM}  SECTOR                              REPORTS  AVG SCORE{RESET}\n"));
    for stat in &summary.by_category {
        let c = level_color(RiskLevel::from_score(stat.average_score));
        out.push_str(&format!(
            "  {:<36}{:>7}  {c}{:>9}{RESET}\n",
            stat.title, stat.reports, stat.average_score
        ));
    }

    out
}
