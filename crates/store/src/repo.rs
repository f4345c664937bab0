//! Repository seam for review record persistence.

use async_trait::async_trait;

use riskgate_core::error::CoreError;
use riskgate_core::review::{ReviewDecision, ReviewRecord, ReviewStatus};
use riskgate_core::types::Timestamp;

/// Errors from a review repository adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The review id does not exist.
    #[error("Review {0} not found")]
    NotFound(String),

    /// A domain validation error (e.g. an invalid decision status).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The backing database failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be decoded back into a review record.
    #[error("Corrupt review record: {0}")]
    Decode(String),
}

/// Persistence operations for review records.
///
/// Adapters are injected into [`ReviewStore`](crate::ReviewStore);
/// there is no process-wide instance. Listing order is insertion order
/// for every adapter.
#[async_trait]
pub trait ReviewRepo: Send + Sync {
    /// Store a freshly created record.
    async fn insert(&self, record: ReviewRecord) -> Result<(), StoreError>;

    /// All records, optionally filtered by exact status, in insertion order.
    async fn list(&self, status: Option<ReviewStatus>) -> Result<Vec<ReviewRecord>, StoreError>;

    /// Look up one record by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<ReviewRecord>, StoreError>;

    /// Apply a decision to a record, returning the updated record.
    ///
    /// The update is atomic per record: status, decision payload, and
    /// `updated_at` change together or not at all.
    async fn apply_decision(
        &self,
        id: &str,
        decision: ReviewDecision,
        now: Timestamp,
    ) -> Result<ReviewRecord, StoreError>;

    /// Whether the backing storage is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}
