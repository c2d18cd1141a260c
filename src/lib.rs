//! Fiscal Sentinel - heuristic risk scoring for public expenditure records
//!
//! Each submitted [`models::TransactionRecord`] is scored against the audit
//! history by a set of independent [`detectors`]. Their contributions are
//! summed and clamped into a 0-100 score with a [`models::RiskLevel`].
//! The [`service::AuditService`] wraps scoring with per-officer approval
//! tracking, an append-only history log and session persistence.

pub mod alerts;
pub mod approval;
pub mod config;
pub mod detectors;
pub mod history;
pub mod models;
pub mod reporters;
pub mod scoring;
pub mod service;
pub mod stats;
pub mod summary;
