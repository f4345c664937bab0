//! Trigger evaluator: decides whether a transaction/analysis pair needs
//! human review, and which reason code applies.
//!
//! All functions here are total and deterministic: malformed or missing
//! fields never fail, they simply do not trigger their predicate, and
//! the evaluation clock is an explicit argument rather than a global
//! read. Identical `(transaction, analysis, now)` inputs always yield
//! identical outcomes.

use chrono::Timelike;

use crate::analysis::RiskAnalysis;
use crate::reason::ReviewReason;
use crate::transaction::Transaction;
use crate::types::Timestamp;

/* --------------------------------------------------------------------------
Thresholds
-------------------------------------------------------------------------- */

/// Risk score (0-100) at or above which review is always required.
pub const HIGH_RISK_SCORE: f64 = 70.0;

/// Risk score (0-100) at or above which the reason escalates to very-high.
pub const VERY_HIGH_RISK_SCORE: f64 = 90.0;

/// Amount above which review is always required.
pub const LARGE_AMOUNT: f64 = 5_000.0;

/// Amount above which the reason escalates to very-large.
pub const VERY_LARGE_AMOUNT: f64 = 10_000.0;

/// Analyzer confidence (0-1) below which review is required.
pub const LOW_CONFIDENCE: f64 = 0.7;

/// Analyzer confidence (0-1) below which the reason escalates to very-low.
pub const VERY_LOW_CONFIDENCE: f64 = 0.5;

/// Keywords that mark a merchant or description as suspicious.
pub const SUSPICIOUS_KEYWORDS: &[&str] = &["casino", "gambling", "offshore", "highrisk"];

/// Location fragments that mark a transaction location as unusual.
pub const UNUSUAL_LOCATIONS: &[&str] = &["offshore", "high risk", "sanctioned"];

/// Inclusive hour-of-day window considered unusual for transactions.
pub const UNUSUAL_HOUR_START: u32 = 1;
pub const UNUSUAL_HOUR_END: u32 = 5;

/* --------------------------------------------------------------------------
Decision predicates
-------------------------------------------------------------------------- */

/// Whether the pair requires human review.
///
/// Each predicate is independent; any one firing is sufficient. `now`
/// only participates when the transaction carries no timestamp of its
/// own (the unusual-hours heuristic).
pub fn requires_review(tx: &Transaction, analysis: &RiskAnalysis, now: Timestamp) -> bool {
    analysis.risk_score >= HIGH_RISK_SCORE
        || tx.amount > LARGE_AMOUNT
        || is_low_confidence(analysis)
        || has_suspicious_pattern(tx)
        || is_unusual_transaction(tx, now)
}

/// Select the reason code for a review.
///
/// Priority-ordered first match, independent of which predicate fired
/// the boolean decision. The fallback is unreachable when callers gate
/// on [`requires_review`], but is handled rather than assumed away.
pub fn review_reason(tx: &Transaction, analysis: &RiskAnalysis, now: Timestamp) -> ReviewReason {
    if analysis.risk_score >= VERY_HIGH_RISK_SCORE {
        ReviewReason::VeryHighRiskScore
    } else if analysis.risk_score >= HIGH_RISK_SCORE {
        ReviewReason::HighRiskScore
    } else if tx.amount > VERY_LARGE_AMOUNT {
        ReviewReason::VeryLargeTransaction
    } else if tx.amount > LARGE_AMOUNT {
        ReviewReason::LargeTransaction
    } else if is_very_low_confidence(analysis) {
        ReviewReason::VeryLowConfidence
    } else if is_low_confidence(analysis) {
        ReviewReason::LowConfidence
    } else if has_suspicious_pattern(tx) {
        ReviewReason::SuspiciousPattern
    } else if is_unusual_transaction(tx, now) {
        ReviewReason::UnusualPattern
    } else {
        ReviewReason::ManualReviewRequired
    }
}

fn is_low_confidence(analysis: &RiskAnalysis) -> bool {
    analysis
        .confidence_score
        .is_some_and(|c| c < LOW_CONFIDENCE)
}

fn is_very_low_confidence(analysis: &RiskAnalysis) -> bool {
    analysis
        .confidence_score
        .is_some_and(|c| c < VERY_LOW_CONFIDENCE)
}

/// Case-insensitive keyword match against merchant and description.
pub fn has_suspicious_pattern(tx: &Transaction) -> bool {
    let merchant = tx.merchant.to_lowercase();
    let description = tx.description.as_deref().map(str::to_lowercase);

    SUSPICIOUS_KEYWORDS.iter().any(|keyword| {
        merchant.contains(keyword)
            || description
                .as_deref()
                .is_some_and(|d| d.contains(keyword))
    })
}

/// Unusual-hours or unusual-location heuristic.
///
/// The hour comes from the transaction's own timestamp when present
/// (in the offset the sender recorded); otherwise from `now` in UTC.
pub fn is_unusual_transaction(tx: &Transaction, now: Timestamp) -> bool {
    let hour = tx.timestamp.map_or_else(|| now.hour(), |ts| ts.hour());
    if (UNUSUAL_HOUR_START..=UNUSUAL_HOUR_END).contains(&hour) {
        return true;
    }

    tx.location.as_deref().is_some_and(|location| {
        let location = location.to_lowercase();
        UNUSUAL_LOCATIONS.iter().any(|frag| location.contains(frag))
    })
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
