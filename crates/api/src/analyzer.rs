//! Fraud-risk analyzer seam.
//!
//! The review subsystem treats analysis as an external collaborator:
//! it consumes a [`RiskAnalysis`] and never computes one. The shipped
//! [`OfflineAnalyzer`] is the heuristic scorer used when no external
//! provider is wired in; LLM-backed analyzers would implement the same
//! trait and are deliberately out of scope here.

use async_trait::async_trait;
use rand::Rng;

use riskgate_core::analysis::{
    risk_score_from_unit, RiskAnalysis, RiskFactor, RiskLevel,
};
use riskgate_core::transaction::Transaction;
use riskgate_core::trigger;

/// Errors from an analyzer collaborator.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Analysis failed: {0}")]
    Failed(String),
}

/// Produces a fraud-risk analysis for one transaction.
#[async_trait]
pub trait TransactionAnalyzer: Send + Sync {
    async fn analyze(&self, transaction: &Transaction) -> Result<RiskAnalysis, AnalyzerError>;
}

/// Weighted heuristic scorer.
///
/// Scores on the 0-1 scale -- weighted amount, merchant, and location
/// terms plus bounded jitter -- then normalizes onto the 0-100 scale the
/// rest of the system uses. Never fails.
pub struct OfflineAnalyzer;

/// Weight of the amount term in the unit score.
const AMOUNT_WEIGHT: f64 = 0.3;
/// Weight of the merchant term.
const MERCHANT_WEIGHT: f64 = 0.2;
/// Weight of the location term.
const LOCATION_WEIGHT: f64 = 0.1;
/// Upper bound of the random jitter term.
const JITTER_MAX: f64 = 0.2;

/// Unit score above which a transaction is flagged high risk.
const HIGH_RISK_THRESHOLD: f64 = 0.7;

impl OfflineAnalyzer {
    fn unit_score(&self, tx: &Transaction) -> f64 {
        let amount_term = if tx.amount > trigger::VERY_LARGE_AMOUNT {
            0.8
        } else {
            tx.amount / trigger::VERY_LARGE_AMOUNT
        };

        let merchant_term = if trigger::has_suspicious_pattern(tx) {
            0.9
        } else {
            0.1
        };

        let risky_location = tx.location.as_deref().is_some_and(|location| {
            let location = location.to_lowercase();
            trigger::UNUSUAL_LOCATIONS
                .iter()
                .any(|frag| location.contains(frag))
        });
        let location_term = if risky_location { 0.7 } else { 0.1 };

        let jitter: f64 = rand::rng().random::<f64>() * JITTER_MAX;

        let raw = AMOUNT_WEIGHT * amount_term
            + MERCHANT_WEIGHT * merchant_term
            + LOCATION_WEIGHT * location_term
            + jitter;

        // Two decimal places, like the scores shown to analysts.
        ((raw.clamp(0.0, 1.0)) * 100.0).round() / 100.0
    }
}

#[async_trait]
impl TransactionAnalyzer for OfflineAnalyzer {
    async fn analyze(&self, tx: &Transaction) -> Result<RiskAnalysis, AnalyzerError> {
        let unit = self.unit_score(tx);
        let is_high_risk = unit > HIGH_RISK_THRESHOLD;

        let transaction_id = tx
            .transaction_id
            .clone()
            .unwrap_or_else(generate_transaction_id);

        let factors = vec![
            RiskFactor {
                name: "Amount".to_string(),
                value: if tx.amount > trigger::VERY_LARGE_AMOUNT {
                    "High".to_string()
                } else {
                    "Normal".to_string()
                },
                impact: AMOUNT_WEIGHT,
            },
            RiskFactor {
                name: "Merchant".to_string(),
                value: tx.merchant.clone(),
                impact: MERCHANT_WEIGHT,
            },
            RiskFactor {
                name: "Location".to_string(),
                value: tx.location.clone().unwrap_or_else(|| "Unknown".to_string()),
                impact: LOCATION_WEIGHT,
            },
        ];

        let recommendations = if is_high_risk {
            vec![
                "Review transaction details".to_string(),
                "Contact customer for verification".to_string(),
            ]
        } else {
            vec!["No action required".to_string()]
        };

        Ok(RiskAnalysis {
            transaction_id,
            risk_score: risk_score_from_unit(unit),
            confidence_score: None,
            risk_level: RiskLevel::from_unit_score(unit),
            is_high_risk,
            explanation: "Heuristic risk analysis (offline analyzer)".to_string(),
            factors,
            recommendations,
            timestamp: chrono::Utc::now(),
        })
    }
}

/// Generate a `txn_` id for transactions submitted without one.
fn generate_transaction_id() -> String {
    format!("txn_{:06}", rand::rng().random_range(0..1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(amount: f64, merchant: &str, location: Option<&str>) -> Transaction {
        Transaction {
            transaction_id: None,
            amount,
            merchant: merchant.to_string(),
            location: location.map(str::to_string),
            description: None,
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn test_benign_transaction_scores_low() {
        let analysis = OfflineAnalyzer
            .analyze(&tx(100.0, "Grocery Store", Some("Local")))
            .await
            .unwrap();
        // 0.3*0.01 + 0.2*0.1 + 0.1*0.1 + jitter <= 0.233 -> at most 23.3.
        assert!(analysis.risk_score <= 24.0);
        assert!(!analysis.is_high_risk);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
    }

    #[tokio::test]
    async fn test_risky_transaction_scores_higher() {
        let analysis = OfflineAnalyzer
            .analyze(&tx(15_000.0, "Suspicious Casino", Some("Offshore")))
            .await
            .unwrap();
        // 0.3*0.8 + 0.2*0.9 + 0.1*0.7 = 0.49 before jitter.
        assert!(analysis.risk_score >= 49.0);
        assert!(analysis.risk_score <= 69.0);
    }

    #[tokio::test]
    async fn test_score_stays_in_range() {
        for amount in [0.0, 500.0, 9_999.0, 1_000_000.0] {
            let analysis = OfflineAnalyzer
                .analyze(&tx(amount, "Casino", Some("Offshore")))
                .await
                .unwrap();
            assert!((0.0..=100.0).contains(&analysis.risk_score));
        }
    }

    #[tokio::test]
    async fn test_supplied_transaction_id_is_kept() {
        let mut t = tx(100.0, "Grocery Store", None);
        t.transaction_id = Some("txn_custom".to_string());
        let analysis = OfflineAnalyzer.analyze(&t).await.unwrap();
        assert_eq!(analysis.transaction_id, "txn_custom");
    }

    #[tokio::test]
    async fn test_generated_transaction_id_has_prefix() {
        let analysis = OfflineAnalyzer
            .analyze(&tx(100.0, "Grocery Store", None))
            .await
            .unwrap();
        assert!(analysis.transaction_id.starts_with("txn_"));
    }
}
