//! Seed corpus
//!
//! Baseline filings per sector so the statistical detectors have
//! something to compare against before any session entries exist.
//! Generation is deterministic for a given seed and reference time.
//!
//! | Sector     | Entries | Entities                             | Amounts       |
//! |------------|---------|--------------------------------------|---------------|
//! | healthcare | 40      | HID-9920-X / HID-8840-Y alternating  | 20k - 170k    |
//! | defence    | 30      | V-9902-DEF                           | 500k - 5M     |
//! | education  | 30      | U-0234-X                             | 10k - 50k     |
//! | taxation   | 40      | GSTIN-ABC / GSTIN-XYZ / PAN-JOHN     | 50k - 550k    |
//! | tenders    | 20      | VEN-INFRA-01 on even rows            | 5M - 25M      |
//! | payroll    | 30      | EMP-2024-i, role-based net salary    | fixed         |
//!
//! Seed entries predate approval tracking and carry no approval.

use crate::models::{Category, HistoryEntry, RiskAnalysisResult, TransactionRecord};
use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::json;

const PAYROLL_ROLES: [(&str, u64); 4] = [
    ("Senior Manager", 150_000),
    ("Developer", 80_000),
    ("Analyst", 60_000),
    ("Clerk", 30_000),
];

/// 2024-01-01T00:00:00Z
const SEED_REFERENCE_SECS: i64 = 1_704_067_200;

/// Fixed instant the seed corpus is dated against.
///
/// It predates every session entry, so restored session filings always
/// sort ahead of the seed in recency windows.
pub fn seed_reference_time() -> DateTime<Utc> {
    DateTime::from_timestamp(SEED_REFERENCE_SECS, 0).unwrap_or_default()
}

/// Seed corpus dated against [`seed_reference_time`]
pub fn seed_history(seed: u64) -> Vec<HistoryEntry> {
    seed_history_at(seed, seed_reference_time())
}

/// Seed corpus relative to a fixed reference time
pub fn seed_history_at(seed: u64, now: DateTime<Utc>) -> Vec<HistoryEntry> {
    let mut generator = SeedGenerator {
        rng: ChaCha8Rng::seed_from_u64(seed),
        now,
    };

    let mut entries = Vec::with_capacity(190);
    generator.healthcare(&mut entries);
    generator.defence(&mut entries);
    generator.education(&mut entries);
    generator.taxation(&mut entries);
    generator.tenders(&mut entries);
    generator.payroll(&mut entries);
    entries
}

struct SeedGenerator {
    rng: ChaCha8Rng,
    now: DateTime<Utc>,
}

impl SeedGenerator {
    /// Uniform whole amount in `low..low + span`
    fn amount(&mut self, low: u64, span: u64) -> f64 {
        (self.rng.random_range(0..span) + low) as f64
    }

    /// A day within the last 30
    fn recent_day(&mut self) -> DateTime<Utc> {
        self.now - Duration::days(self.rng.random_range(0..30))
    }

    fn recent_date(&mut self) -> String {
        self.recent_day().format("%Y-%m-%d").to_string()
    }

    fn entry(&self, id: String, score: u8, input: TransactionRecord) -> HistoryEntry {
        HistoryEntry::new(input, RiskAnalysisResult::baseline(score), None)
            .with_id(id)
            .with_date(self.now)
    }

    fn healthcare(&mut self, out: &mut Vec<HistoryEntry>) {
        for i in 0..40 {
            let (name, id) = if i % 2 == 0 {
                ("City General Hospital", "HID-9920-X")
            } else {
                ("Apollo Clinics", "HID-8840-Y")
            };
            let amount = self.amount(20_000, 150_000);
            let input = TransactionRecord::new(Category::Healthcare, id, name, amount)
                .with_location("Metro Zone 1")
                .with_reason("General Consultation")
                .with_date(self.recent_date());
            out.push(self.entry(format!("hist-hc-{i}"), 10, input));
        }
    }

    fn defence(&mut self, out: &mut Vec<HistoryEntry>) {
        for i in 0..30 {
            let amount = self.amount(500_000, 4_500_000);
            let input = TransactionRecord::new(Category::Defence, "V-9902-DEF", "Bharat Dynamics Ltd", amount)
                .with_sub_category("Equipment Repair & Maintenance")
                .with_location("Northern Command")
                .with_reason("Routine Maintenance")
                .with_date(self.recent_date());
            out.push(self.entry(format!("hist-def-{i}"), 15, input));
        }
    }

    fn education(&mut self, out: &mut Vec<HistoryEntry>) {
        for i in 0..30 {
            let amount = self.amount(10_000, 40_000);
            let input = TransactionRecord::new(
                Category::Education,
                "U-0234-X",
                "National Institute of Technology",
                amount,
            )
            .with_location("District A")
            .with_reason("Semester Grant")
            .with_date(self.recent_date());
            out.push(self.entry(format!("hist-edu-{i}"), 5, input));
        }
    }

    fn taxation(&mut self, out: &mut Vec<HistoryEntry>) {
        for i in 0..40 {
            let late = i % 10 == 0;
            let (name, id, payer) = match i % 3 {
                0 => ("ABC Pvt Ltd", "GSTIN-ABC", "Company"),
                1 => ("XYZ Corp", "GSTIN-XYZ", "Company"),
                _ => ("John Doe", "PAN-JOHN", "Individual"),
            };
            let filed = self.recent_day();
            let due = filed + Duration::days(if late { -5 } else { 5 });
            let amount = self.amount(50_000, 500_000);

            let input = TransactionRecord::new(Category::Taxation, id, name, amount)
                .with_location("Zone 1")
                .with_reason("Quarterly Tax Return")
                .with_date(filed.format("%Y-%m-%d").to_string())
                .with_attribute("taxPayerType", json!(payer))
                .with_attribute("taxPeriod", json!("Quarter"))
                .with_attribute("dueDate", json!(due.format("%Y-%m-%d").to_string()));
            out.push(self.entry(format!("hist-tax-{i}"), if late { 30 } else { 5 }, input));
        }
    }

    fn tenders(&mut self, out: &mut Vec<HistoryEntry>) {
        for i in 0..20 {
            let recurring = i % 2 == 0;
            let (name, id) = if recurring {
                ("InfraTech Ltd", "VEN-INFRA-01".to_string())
            } else {
                ("BuildWell Corp", format!("VEN-BW-{i}"))
            };
            let amount = self.amount(5_000_000, 20_000_000);
            let estimate = self.amount(6_000_000, 20_000_000);

            let input = TransactionRecord::new(Category::Tenders, id, name, amount)
                .with_sub_category("Infrastructure")
                .with_location("State Highway Zone")
                .with_reason(format!("Road Construction Phase {i}"))
                .with_attribute("estimatedCost", json!(estimate.to_string()))
                .with_attribute("tenderId", json!(format!("TND-2023-{i}")))
                .with_attribute("tenderReleaseDate", json!(self.recent_date()))
                .with_attribute("tenderClosingDate", json!(self.recent_date()))
                .with_attribute("vendorLocation", json!("Hyderabad"))
                .with_attribute("pastProjectsCount", json!(if recurring { "15" } else { "5" }))
                .with_date(self.recent_date());
            out.push(self.entry(format!("hist-tender-{i}"), if recurring { 40 } else { 10 }, input));
        }
    }

    fn payroll(&mut self, out: &mut Vec<HistoryEntry>) {
        for i in 0..30 {
            let (role, base) = PAYROLL_ROLES[i % PAYROLL_ROLES.len()];
            let basic = base * 6 / 10;
            let allowances = base * 3 / 10;
            let deductions = base / 10;
            let net = basic + allowances - deductions;

            let input = TransactionRecord::new(
                Category::Payroll,
                format!("EMP-2024-{i}"),
                format!("Employee {i}"),
                net as f64,
            )
            .with_sub_category("Operations")
            .with_location("Headquarters")
            .with_reason("Monthly Salary")
            .with_attribute("basicSalary", json!(basic.to_string()))
            .with_attribute("allowances", json!(allowances.to_string()))
            .with_attribute("deductions", json!(deductions.to_string()))
            .with_attribute("designation", json!(role))
            .with_date(self.recent_date());

            // payroll entries are dated by pay day, not by load time
            let filed = self.recent_day();
            out.push(self.entry(format!("hist-pay-{i}"), 5, input).with_date(filed));
        }
    }
}
