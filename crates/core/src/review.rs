//! Review record model and decision validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::RiskAnalysis;
use crate::error::CoreError;
use crate::priority::compute_priority;
use crate::reason::ReviewReason;
use crate::transaction::Transaction;
use crate::types::Timestamp;

/// Prefix for generated review ids.
pub const REVIEW_ID_PREFIX: &str = "rev_";

/// Review lifecycle status. `Pending` is initial; `Approved` and
/// `Rejected` are decision outcomes. There is no transition back to
/// `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: pending, approved, rejected"
            ))),
        }
    }
}

/// Validate a decision status string.
///
/// Only the two terminal outcomes are acceptable as a decision;
/// anything else (including "pending") is rejected.
pub fn validate_decision_status(status: &str) -> Result<ReviewStatus, CoreError> {
    match status {
        "approved" => Ok(ReviewStatus::Approved),
        "rejected" => Ok(ReviewStatus::Rejected),
        _ => Err(CoreError::Validation(
            "Invalid status. Must be \"approved\" or \"rejected\"".to_string(),
        )),
    }
}

/// A reviewer's recorded decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDecision {
    pub status: ReviewStatus,
    pub reviewer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub reviewed_at: Timestamp,
}

/// Request body for the decision endpoint.
///
/// `status` stays a raw string here so an invalid value surfaces as a
/// validation error with a precise message rather than a generic
/// deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub status: String,
    pub reviewer_id: String,
    #[serde(default)]
    pub comments: Option<String>,
}

/// A queued human review of one analyzed transaction.
///
/// `risk_score`, `reason`, `priority` and the two snapshots are frozen
/// at creation; only `status`, `decision` and `updated_at` change, and
/// only through a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: String,
    pub transaction_id: String,
    pub status: ReviewStatus,
    pub risk_score: f64,
    pub reason: ReviewReason,
    pub priority: i16,
    pub transaction_details: Transaction,
    pub analysis_result: RiskAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<ReviewDecision>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ReviewRecord {
    /// Build a new pending review with a fresh `rev_` id and a priority
    /// computed from the frozen risk score and reason.
    pub fn new(
        transaction_id: String,
        transaction: Transaction,
        analysis: RiskAnalysis,
        reason: ReviewReason,
        created_at: Timestamp,
    ) -> Self {
        let priority = compute_priority(analysis.risk_score, reason);
        Self {
            id: format!("{REVIEW_ID_PREFIX}{}", Uuid::new_v4()),
            transaction_id,
            status: ReviewStatus::Pending,
            risk_score: analysis.risk_score,
            reason,
            priority,
            transaction_details: transaction,
            analysis_result: analysis,
            decision: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// Record a decision, replacing any prior one.
    ///
    /// Repeat decisions overwrite silently; see DESIGN.md for why the
    /// permissive policy is kept.
    pub fn apply_decision(&mut self, decision: ReviewDecision, now: Timestamp) {
        self.status = decision.status;
        self.decision = Some(decision);
        self.updated_at = now;
    }
}
