//! Durable review repository backed by Postgres.
//!
//! Review records are stored one row per review, with the frozen
//! transaction and analysis snapshots as JSONB. Transient connection
//! failures during creation are retried with bounded backoff here, at
//! the store boundary, so the interceptor never has to.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::FromRow;

use riskgate_core::review::{ReviewDecision, ReviewRecord, ReviewStatus};
use riskgate_core::types::Timestamp;

use crate::repo::{ReviewRepo, StoreError};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run the embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Column list for reviews queries.
const REVIEW_COLUMNS: &str = "id, transaction_id, status, risk_score, reason, priority, \
    transaction_details, analysis_result, decision_status, reviewer_id, comments, \
    reviewed_at, created_at, updated_at";

/// Creation retry attempts before the failure is surfaced.
const INSERT_ATTEMPTS: u32 = 3;
/// Backoff before the first retry; doubles per attempt.
const INSERT_RETRY_BASE: Duration = Duration::from_millis(50);

/// A row from the `reviews` table.
#[derive(Debug, FromRow)]
struct ReviewRow {
    id: String,
    transaction_id: String,
    status: String,
    risk_score: f64,
    reason: String,
    priority: i16,
    transaction_details: serde_json::Value,
    analysis_result: serde_json::Value,
    decision_status: Option<String>,
    reviewer_id: Option<String>,
    comments: Option<String>,
    reviewed_at: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl TryFrom<ReviewRow> for ReviewRecord {
    type Error = StoreError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let decode = |what: &str, err: String| StoreError::Decode(format!("{what}: {err}"));

        let status = ReviewStatus::from_str(&row.status)
            .map_err(|e| decode("status", e.to_string()))?;
        let reason = row
            .reason
            .parse()
            .map_err(|e: riskgate_core::error::CoreError| decode("reason", e.to_string()))?;
        let transaction_details = serde_json::from_value(row.transaction_details)
            .map_err(|e| decode("transaction_details", e.to_string()))?;
        let analysis_result = serde_json::from_value(row.analysis_result)
            .map_err(|e| decode("analysis_result", e.to_string()))?;

        let decision = match (row.decision_status, row.reviewer_id, row.reviewed_at) {
            (Some(s), Some(reviewer_id), Some(reviewed_at)) => Some(ReviewDecision {
                status: ReviewStatus::from_str(&s)
                    .map_err(|e| decode("decision_status", e.to_string()))?,
                reviewer_id,
                comments: row.comments,
                reviewed_at,
            }),
            (None, None, None) => None,
            _ => {
                return Err(decode(
                    "decision",
                    "partially populated decision columns".to_string(),
                ))
            }
        };

        Ok(ReviewRecord {
            id: row.id,
            transaction_id: row.transaction_id,
            status,
            risk_score: row.risk_score,
            reason,
            priority: row.priority,
            transaction_details,
            analysis_result,
            decision,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Review repository backed by a Postgres pool.
pub struct PostgresReviewRepo {
    pool: DbPool,
}

impl PostgresReviewRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn try_insert(
        &self,
        record: &ReviewRecord,
        transaction_details: &serde_json::Value,
        analysis_result: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO reviews
                (id, transaction_id, status, risk_score, reason, priority,
                 transaction_details, analysis_result, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&record.id)
        .bind(&record.transaction_id)
        .bind(record.status.as_str())
        .bind(record.risk_score)
        .bind(record.reason.as_str())
        .bind(record.priority)
        .bind(transaction_details)
        .bind(analysis_result)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Whether an error is worth retrying at the store boundary.
fn is_transient(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl ReviewRepo for PostgresReviewRepo {
    async fn insert(&self, record: ReviewRecord) -> Result<(), StoreError> {
        let transaction_details = serde_json::to_value(&record.transaction_details)
            .map_err(|e| StoreError::Decode(format!("transaction snapshot: {e}")))?;
        let analysis_result = serde_json::to_value(&record.analysis_result)
            .map_err(|e| StoreError::Decode(format!("analysis snapshot: {e}")))?;

        let mut attempt = 0;
        loop {
            match self
                .try_insert(&record, &transaction_details, &analysis_result)
                .await
            {
                Ok(()) => return Ok(()),
                Err(err) if attempt + 1 < INSERT_ATTEMPTS && is_transient(&err) => {
                    attempt += 1;
                    tracing::warn!(
                        review_id = %record.id,
                        attempt,
                        error = %err,
                        "Transient error storing review, retrying"
                    );
                    tokio::time::sleep(INSERT_RETRY_BASE * 2u32.pow(attempt - 1)).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn list(&self, status: Option<ReviewStatus>) -> Result<Vec<ReviewRecord>, StoreError> {
        // created_at ties are broken by id so the order is stable.
        let rows: Vec<ReviewRow> = match status {
            Some(status) => {
                let query = format!(
                    "SELECT {REVIEW_COLUMNS} FROM reviews
                     WHERE status = $1
                     ORDER BY created_at ASC, id ASC"
                );
                sqlx::query_as(&query)
                    .bind(status.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!(
                    "SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY created_at ASC, id ASC"
                );
                sqlx::query_as(&query).fetch_all(&self.pool).await?
            }
        };

        rows.into_iter().map(ReviewRecord::try_from).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ReviewRecord>, StoreError> {
        let query = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1");
        let row: Option<ReviewRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ReviewRecord::try_from).transpose()
    }

    async fn apply_decision(
        &self,
        id: &str,
        decision: ReviewDecision,
        now: Timestamp,
    ) -> Result<ReviewRecord, StoreError> {
        let query = format!(
            "UPDATE reviews
             SET status = $2, decision_status = $2, reviewer_id = $3,
                 comments = $4, reviewed_at = $5, updated_at = $6
             WHERE id = $1
             RETURNING {REVIEW_COLUMNS}"
        );
        let row: Option<ReviewRow> = sqlx::query_as(&query)
            .bind(id)
            .bind(decision.status.as_str())
            .bind(&decision.reviewer_id)
            .bind(&decision.comments)
            .bind(decision.reviewed_at)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ReviewRecord::try_from)
            .transpose()?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
