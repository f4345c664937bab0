use std::sync::Arc;

use riskgate_store::ReviewStore;

use crate::analyzer::TransactionAnalyzer;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Review store service (repository adapter + notifier).
    pub reviews: ReviewStore,
    /// Fraud-risk analyzer collaborator.
    pub analyzer: Arc<dyn TransactionAnalyzer>,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
}
