//! Reviewer notification seam.
//!
//! Creation of a review *attempts* a notification; the store contract
//! never promises delivery, and a failed or slow notifier must not be
//! observable by the caller that created the review.

use async_trait::async_trait;

use riskgate_core::review::ReviewRecord;

/// Collaborator that alerts reviewers to a newly queued review.
#[async_trait]
pub trait ReviewerNotifier: Send + Sync {
    async fn notify(&self, review: &ReviewRecord);
}

/// Notifier that records the escalation in the service log.
///
/// Stands in for a real channel (email, chat, pager) in deployments
/// that have none configured.
pub struct LogNotifier;

#[async_trait]
impl ReviewerNotifier for LogNotifier {
    async fn notify(&self, review: &ReviewRecord) {
        tracing::info!(
            review_id = %review.id,
            transaction_id = %review.transaction_id,
            priority = review.priority,
            reason = %review.reason,
            "Review queued, reviewers notified"
        );
    }
}
