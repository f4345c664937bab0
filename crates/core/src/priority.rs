//! Priority calculator for the review queue.

use crate::reason::ReviewReason;

/// Lowest triage priority.
pub const MIN_PRIORITY: i16 = 1;
/// Highest triage priority.
pub const MAX_PRIORITY: i16 = 10;
/// Starting priority before adjustments.
pub const BASE_PRIORITY: i16 = 5;

/// Compute the 1-10 triage priority for a new review.
///
/// Base 5; +3 for risk score >= 80, else +1 for >= 60; +2 when the
/// escalation came from an analyzer failure; an emergency escalation
/// overrides everything to 10. Result is clamped to [1, 10].
pub fn compute_priority(risk_score: f64, reason: ReviewReason) -> i16 {
    let mut priority = BASE_PRIORITY;

    if risk_score >= 80.0 {
        priority += 3;
    } else if risk_score >= 60.0 {
        priority += 1;
    }

    if reason == ReviewReason::AiFailure {
        priority += 2;
    }
    if reason == ReviewReason::Emergency {
        priority = MAX_PRIORITY;
    }

    priority.clamp(MIN_PRIORITY, MAX_PRIORITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_priority_for_modest_score() {
        assert_eq!(compute_priority(30.0, ReviewReason::SuspiciousPattern), 5);
    }

    #[test]
    fn test_high_score_adds_three() {
        assert_eq!(compute_priority(85.0, ReviewReason::HighRiskScore), 8);
        assert_eq!(compute_priority(80.0, ReviewReason::HighRiskScore), 8);
    }

    #[test]
    fn test_elevated_score_adds_one() {
        assert_eq!(compute_priority(60.0, ReviewReason::LargeTransaction), 6);
        assert_eq!(compute_priority(79.9, ReviewReason::LargeTransaction), 6);
    }

    #[test]
    fn test_ai_failure_adds_two() {
        assert_eq!(compute_priority(30.0, ReviewReason::AiFailure), 7);
        // Stacks with the high-score bonus, then clamps.
        assert_eq!(compute_priority(85.0, ReviewReason::AiFailure), 10);
    }

    #[test]
    fn test_emergency_overrides_everything() {
        assert_eq!(compute_priority(50.0, ReviewReason::Emergency), 10);
        assert_eq!(compute_priority(0.0, ReviewReason::Emergency), 10);
    }

    #[test]
    fn test_result_stays_in_range() {
        for score in [0.0, 59.9, 60.0, 80.0, 100.0] {
            for reason in [
                ReviewReason::VeryHighRiskScore,
                ReviewReason::AiFailure,
                ReviewReason::Emergency,
                ReviewReason::ManualReviewRequired,
            ] {
                let p = compute_priority(score, reason);
                assert!((MIN_PRIORITY..=MAX_PRIORITY).contains(&p));
            }
        }
    }
}
