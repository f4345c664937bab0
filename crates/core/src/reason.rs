//! Reason catalog: why a transaction was escalated to a human reviewer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Enumerated escalation reason, chosen once at review creation.
///
/// `AiFailure` and `Emergency` are never produced by the trigger
/// evaluator; they exist for producers that escalate outside the normal
/// predicate cascade and they feed the priority calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewReason {
    VeryHighRiskScore,
    HighRiskScore,
    VeryLargeTransaction,
    LargeTransaction,
    VeryLowConfidence,
    LowConfidence,
    SuspiciousPattern,
    UnusualPattern,
    AiFailure,
    Emergency,
    ManualReviewRequired,
}

impl ReviewReason {
    /// The wire/storage form of the reason code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryHighRiskScore => "very_high_risk_score",
            Self::HighRiskScore => "high_risk_score",
            Self::VeryLargeTransaction => "very_large_transaction",
            Self::LargeTransaction => "large_transaction",
            Self::VeryLowConfidence => "very_low_confidence",
            Self::LowConfidence => "low_confidence",
            Self::SuspiciousPattern => "suspicious_pattern",
            Self::UnusualPattern => "unusual_pattern",
            Self::AiFailure => "ai_failure",
            Self::Emergency => "emergency",
            Self::ManualReviewRequired => "manual_review_required",
        }
    }

    /// Human-readable description shown to reviewers and merged into
    /// augmented analysis responses.
    pub fn description(self) -> &'static str {
        match self {
            Self::VeryHighRiskScore => "Very high risk score (90+)",
            Self::HighRiskScore => "High risk score (70-89)",
            Self::VeryLargeTransaction => "Very large transaction amount (>$10,000)",
            Self::LargeTransaction => "Large transaction amount (>$5,000)",
            Self::VeryLowConfidence => "Very low confidence in analysis",
            Self::LowConfidence => "Low confidence in analysis",
            Self::SuspiciousPattern => "Suspicious transaction pattern detected",
            Self::UnusualPattern => "Unusual transaction pattern",
            Self::ManualReviewRequired => "Manual review required",
            // Codes without a dedicated description.
            Self::AiFailure | Self::Emergency => "Review required",
        }
    }
}

impl fmt::Display for ReviewReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewReason {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very_high_risk_score" => Ok(Self::VeryHighRiskScore),
            "high_risk_score" => Ok(Self::HighRiskScore),
            "very_large_transaction" => Ok(Self::VeryLargeTransaction),
            "large_transaction" => Ok(Self::LargeTransaction),
            "very_low_confidence" => Ok(Self::VeryLowConfidence),
            "low_confidence" => Ok(Self::LowConfidence),
            "suspicious_pattern" => Ok(Self::SuspiciousPattern),
            "unusual_pattern" => Ok(Self::UnusualPattern),
            "ai_failure" => Ok(Self::AiFailure),
            "emergency" => Ok(Self::Emergency),
            "manual_review_required" => Ok(Self::ManualReviewRequired),
            other => Err(CoreError::Validation(format!(
                "Unknown review reason '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[ReviewReason] = &[
        ReviewReason::VeryHighRiskScore,
        ReviewReason::HighRiskScore,
        ReviewReason::VeryLargeTransaction,
        ReviewReason::LargeTransaction,
        ReviewReason::VeryLowConfidence,
        ReviewReason::LowConfidence,
        ReviewReason::SuspiciousPattern,
        ReviewReason::UnusualPattern,
        ReviewReason::AiFailure,
        ReviewReason::Emergency,
        ReviewReason::ManualReviewRequired,
    ];

    #[test]
    fn test_reason_round_trips_through_str() {
        for reason in ALL {
            assert_eq!(reason.as_str().parse::<ReviewReason>().unwrap(), *reason);
        }
    }

    #[test]
    fn test_every_reason_has_a_description() {
        for reason in ALL {
            assert!(!reason.description().is_empty());
        }
    }

    #[test]
    fn test_codes_without_dedicated_description_fall_back() {
        assert_eq!(ReviewReason::AiFailure.description(), "Review required");
        assert_eq!(ReviewReason::Emergency.description(), "Review required");
    }

    #[test]
    fn test_unknown_reason_rejected() {
        assert!("totally_fine".parse::<ReviewReason>().is_err());
    }
}
