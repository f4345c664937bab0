//! The review store service: the single owner of review lifecycle.

use std::sync::Arc;

use riskgate_core::review::{
    validate_decision_status, DecisionRequest, ReviewDecision, ReviewRecord, ReviewStatus,
};
use riskgate_core::types::Timestamp;

use crate::notify::{LogNotifier, ReviewerNotifier};
use crate::repo::{ReviewRepo, StoreError};
use crate::MemoryReviewRepo;

/// Fronts a repository adapter and a notifier collaborator.
///
/// Cheaply cloneable; both collaborators are behind `Arc` and are
/// injected, never global.
#[derive(Clone)]
pub struct ReviewStore {
    repo: Arc<dyn ReviewRepo>,
    notifier: Arc<dyn ReviewerNotifier>,
}

impl ReviewStore {
    pub fn new(repo: Arc<dyn ReviewRepo>, notifier: Arc<dyn ReviewerNotifier>) -> Self {
        Self { repo, notifier }
    }

    /// Memory-backed store with log notifications. The default for
    /// tests and deployments without a configured database.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryReviewRepo::new()), Arc::new(LogNotifier))
    }

    /// Persist a new review and kick off the reviewer notification.
    ///
    /// The notification runs on a detached task: a slow or failing
    /// notifier never delays or fails creation.
    pub async fn create_review(&self, record: ReviewRecord) -> Result<String, StoreError> {
        let id = record.id.clone();
        self.repo.insert(record.clone()).await?;

        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            notifier.notify(&record).await;
        });

        Ok(id)
    }

    /// All reviews, optionally filtered by status, in insertion order.
    pub async fn get_reviews(
        &self,
        status: Option<ReviewStatus>,
    ) -> Result<Vec<ReviewRecord>, StoreError> {
        self.repo.list(status).await
    }

    pub async fn get_review(&self, id: &str) -> Result<Option<ReviewRecord>, StoreError> {
        self.repo.find_by_id(id).await
    }

    /// Validate and apply a reviewer's decision.
    ///
    /// Rejects any status other than approved/rejected before touching
    /// the repository, so an invalid request leaves the record
    /// untouched. A repeat decision on an already-decided review
    /// overwrites the prior decision (documented permissive behavior).
    pub async fn process_decision(
        &self,
        id: &str,
        request: DecisionRequest,
        now: Timestamp,
    ) -> Result<ReviewRecord, StoreError> {
        let status = validate_decision_status(&request.status)?;

        let decision = ReviewDecision {
            status,
            reviewer_id: request.reviewer_id,
            comments: request.comments,
            reviewed_at: now,
        };
        self.repo.apply_decision(id, decision, now).await
    }

    /// Whether the backing repository is reachable.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.repo.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use riskgate_core::analysis::{RiskAnalysis, RiskLevel};
    use riskgate_core::reason::ReviewReason;
    use riskgate_core::transaction::Transaction;

    fn record() -> ReviewRecord {
        let created = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let tx = Transaction {
            transaction_id: Some("txn_9".to_string()),
            amount: 8_000.0,
            merchant: "Acme Corp".to_string(),
            location: None,
            description: None,
            timestamp: None,
        };
        let analysis = RiskAnalysis {
            transaction_id: "txn_9".to_string(),
            risk_score: 65.0,
            confidence_score: Some(0.9),
            risk_level: RiskLevel::Medium,
            is_high_risk: false,
            explanation: "test".to_string(),
            factors: vec![],
            recommendations: vec![],
            timestamp: created,
        };
        ReviewRecord::new(
            "txn_9".to_string(),
            tx,
            analysis,
            ReviewReason::LargeTransaction,
            created,
        )
    }

    fn request(status: &str) -> DecisionRequest {
        DecisionRequest {
            status: status.to_string(),
            reviewer_id: "reviewer-1".to_string(),
            comments: Some("checked".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_then_fetch_is_pending() {
        let store = ReviewStore::in_memory();
        let id = store.create_review(record()).await.unwrap();

        let fetched = store.get_review(&id).await.unwrap().unwrap();
        assert_eq!(fetched.status, ReviewStatus::Pending);
        assert!(fetched.decision.is_none());
        // 5 base + 1 for score >= 60.
        assert_eq!(fetched.priority, 6);
    }

    #[tokio::test]
    async fn test_decision_approves_and_stamps() {
        let store = ReviewStore::in_memory();
        let id = store.create_review(record()).await.unwrap();

        let now = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
        let updated = store
            .process_decision(&id, request("approved"), now)
            .await
            .unwrap();

        assert_eq!(updated.status, ReviewStatus::Approved);
        assert_eq!(updated.updated_at, now);
        let decision = updated.decision.unwrap();
        assert_eq!(decision.reviewer_id, "reviewer-1");
        assert_eq!(decision.reviewed_at, now);
    }

    #[tokio::test]
    async fn test_invalid_decision_status_leaves_record_untouched() {
        let store = ReviewStore::in_memory();
        let id = store.create_review(record()).await.unwrap();

        let now = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
        let err = store
            .process_decision(&id, request("maybe"), now)
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::Core(_));

        let fetched = store.get_review(&id).await.unwrap().unwrap();
        assert_eq!(fetched.status, ReviewStatus::Pending);
        assert!(fetched.decision.is_none());
    }

    #[tokio::test]
    async fn test_decision_on_unknown_id_is_not_found() {
        let store = ReviewStore::in_memory();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
        let err = store
            .process_decision("rev_missing", request("approved"), now)
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::NotFound(_));
    }

    #[tokio::test]
    async fn test_repeat_decision_overwrites_silently() {
        let store = ReviewStore::in_memory();
        let id = store.create_review(record()).await.unwrap();

        let t1 = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap();
        store
            .process_decision(&id, request("approved"), t1)
            .await
            .unwrap();
        let second = store
            .process_decision(&id, request("rejected"), t2)
            .await
            .unwrap();

        assert_eq!(second.status, ReviewStatus::Rejected);
        assert_eq!(second.updated_at, t2);
    }
}
