//! Fraud-risk analysis result model.
//!
//! Analyses are produced by an analyzer collaborator; this crate only
//! reads them. Risk scores are on the 0-100 scale everywhere inside the
//! core. Producers that score on the 0-1 scale must normalize with
//! [`risk_score_from_unit`] before the trigger evaluator sees the value.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Risk band boundaries on the 0-1 scale.
const HIGH_RISK_UNIT: f64 = 0.7;
const MEDIUM_RISK_UNIT: f64 = 0.4;

/// Coarse risk band for an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Derive the band from a 0-1 score: High above 0.7, Medium above 0.4.
    pub fn from_unit_score(unit: f64) -> Self {
        if unit > HIGH_RISK_UNIT {
            Self::High
        } else if unit > MEDIUM_RISK_UNIT {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// A single named contribution to the overall risk score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub value: String,
    pub impact: f64,
}

/// The analyzer's verdict on one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    pub transaction_id: String,
    /// 0-100.
    pub risk_score: f64,
    /// 0-1; absent when the analyzer does not estimate its own confidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    pub risk_level: RiskLevel,
    pub is_high_risk: bool,
    pub explanation: String,
    #[serde(default)]
    pub factors: Vec<RiskFactor>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub timestamp: Timestamp,
}

/// Normalize a 0-1 score onto the 0-100 scale used by the core.
///
/// Out-of-range inputs are clamped rather than rejected; the trigger
/// evaluator must stay total over whatever a producer emits.
pub fn risk_score_from_unit(unit: f64) -> f64 {
    unit.clamp(0.0, 1.0) * 100.0
}
