//! Session dashboard statistics

use crate::models::{Category, HistoryEntry};
use serde::Serialize;

/// Per-sector activity in the session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: Category,
    pub title: &'static str,
    pub reports: usize,
    /// Rounded mean score, 0 with no reports
    pub average_score: u8,
}

/// Aggregate view over session reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub report_count: usize,
    pub total_audited: f64,
    /// Reports classified HIGH or CRITICAL
    pub high_risk_count: usize,
    pub high_risk_amount: f64,
    /// Every sector, in declaration order
    pub by_category: Vec<CategoryStat>,
}

impl SessionSummary {
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let total_audited = entries.iter().map(|e| e.input.amount).sum();
        let high_risk: Vec<&HistoryEntry> =
            entries.iter().filter(|e| e.analysis.level.is_elevated()).collect();
        let high_risk_amount = high_risk.iter().map(|e| e.input.amount).sum();

        let by_category = Category::all()
            .iter()
            .map(|category| {
                let scores: Vec<u32> = entries
                    .iter()
                    .filter(|e| e.input.category == *category)
                    .map(|e| e.analysis.score as u32)
                    .collect();
                let average_score = if scores.is_empty() {
                    0
                } else {
                    (scores.iter().sum::<u32>() as f64 / scores.len() as f64).round() as u8
                };
                CategoryStat {
                    category: *category,
                    title: category.title(),
                    reports: scores.len(),
                    average_score,
                }
            })
            .collect();

        Self {
            report_count: entries.len(),
            total_audited,
            high_risk_count: high_risk.len(),
            high_risk_amount,
            by_category,
        }
    }
}

/// Compact rupee formatting: crore above 1e7, lakh above 1e5
pub fn format_currency(value: f64) -> String {
    if value >= 10_000_000.0 {
        format!("₹{:.2}Cr", value / 10_000_000.0)
    } else if value >= 100_000.0 {
        format!("₹{:.2}L", value / 100_000.0)
    } else {
        format!("₹{}", group_thousands(value))
    }
}

fn group_thousands(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let cents = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if cents == 0 {
        grouped
    } else if cents % 10 == 0 {
        format!("{}.{}", grouped, cents / 10)
    } else {
        format!("{}.{:02}", grouped, cents)
    }
}
