//! Transaction input model.
//!
//! Transactions are produced by callers of the analyze endpoint and are
//! never mutated by this crate; review records freeze a snapshot of the
//! transaction for audit purposes.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A financial transaction submitted for fraud analysis.
///
/// The `timestamp` keeps the sender's original UTC offset so the
/// unusual-hours heuristic sees the hour the sender recorded, not a
/// normalized one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Caller-supplied id; when absent the analyzer generates one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Amount in the transaction's native currency units.
    pub amount: f64,
    pub merchant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<FixedOffset>>,
}
