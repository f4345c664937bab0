//! In-memory review repository.
//!
//! Backs tests and single-process deployments. The `RwLock` serializes
//! the single-writer-per-record race the decision endpoint would
//! otherwise be exposed to; readers proceed concurrently.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use riskgate_core::review::{ReviewDecision, ReviewRecord, ReviewStatus};
use riskgate_core::types::Timestamp;

use crate::repo::{ReviewRepo, StoreError};

#[derive(Default)]
struct Inner {
    records: HashMap<String, ReviewRecord>,
    /// Ids in insertion order; listing walks this, not the map.
    order: Vec<String>,
}

/// Review repository held entirely in process memory.
///
/// Records are never evicted; unbounded growth is an accepted
/// limitation of this adapter.
#[derive(Default)]
pub struct MemoryReviewRepo {
    inner: RwLock<Inner>,
}

impl MemoryReviewRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepo for MemoryReviewRepo {
    async fn insert(&self, record: ReviewRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.order.push(record.id.clone());
        inner.records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn list(&self, status: Option<ReviewStatus>) -> Result<Vec<ReviewRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id))
            .filter(|record| status.is_none_or(|s| record.status == s))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ReviewRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(id).cloned())
    }

    async fn apply_decision(
        &self,
        id: &str,
        decision: ReviewDecision,
        now: Timestamp,
    ) -> Result<ReviewRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.apply_decision(decision, now);
        Ok(record.clone())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
