//! Handler for the transaction analysis endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use riskgate_core::analysis::RiskAnalysis;
use riskgate_core::error::CoreError;
use riskgate_core::transaction::Transaction;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for the analyze endpoint.
///
/// Required fields stay `Option` so a missing one produces the
/// endpoint's own validation message instead of a generic
/// deserialization error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub timestamp: Option<chrono::DateTime<chrono::FixedOffset>>,
}

impl AnalyzeRequest {
    /// Validate required fields and build the transaction.
    fn into_transaction(self) -> Result<Transaction, CoreError> {
        let amount = self.amount.filter(|a| a.is_finite() && *a > 0.0);
        let merchant = self.merchant.filter(|m| !m.trim().is_empty());
        let (Some(amount), Some(merchant)) = (amount, merchant) else {
            return Err(CoreError::Validation(
                "Missing required fields: amount and merchant are required".to_string(),
            ));
        };

        Ok(Transaction {
            transaction_id: self.transaction_id,
            amount,
            merchant,
            location: self.location,
            description: self.description,
            timestamp: self.timestamp,
        })
    }
}

/// POST /api/v1/analyze/transaction
///
/// Produce a fraud-risk analysis for one transaction. Requires
/// authentication; any role may analyze. The HITL interceptor wrapping
/// this route decides whether the result also needs human review.
pub async fn analyze_transaction(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AnalyzeRequest>,
) -> AppResult<Json<RiskAnalysis>> {
    let transaction = input.into_transaction()?;

    tracing::info!(
        amount = transaction.amount,
        merchant = %transaction.merchant,
        location = transaction.location.as_deref().unwrap_or("Unknown"),
        "Analyzing transaction"
    );

    let analysis = state
        .analyzer
        .analyze(&transaction)
        .await
        .map_err(|err| AppError::Core(CoreError::Dependency(err.to_string())))?;

    Ok(Json(analysis))
}
