// Port for the outbox table: due-scan, tick commit, requeue, and counters.
//
// Purpose
// - Describe the locking contract the relay depends on: a due batch claims
//   its rows so a concurrent worker's identical query skips them instead of
//   blocking, and the claims release when the tick commits or aborts.
//
// Boundaries
// - No concrete storage here. The in-memory adapter lives in
//   `shared::infrastructure::in_memory`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::modules::outbox::core::event::{OutboxEvent, OutboxStatus};

#[derive(Debug, Error)]
pub enum OutboxStoreError {
    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// Rows with status New or Retry whose `next_attempt_at` is absent or has
    /// passed, ordered by `created_at` ascending, at most `limit`. Returned
    /// rows are locked until `commit_tick` or `release_batch`; rows locked by
    /// another caller are skipped, never waited on.
    async fn fetch_due_batch(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<OutboxEvent>, OutboxStoreError>;

    /// Applies a whole tick's row updates atomically and releases their locks.
    async fn commit_tick(&self, updates: Vec<OutboxEvent>) -> Result<(), OutboxStoreError>;

    /// Releases locks without applying updates (tick abort path).
    async fn release_batch(&self, ids: &[Uuid]) -> Result<(), OutboxStoreError>;

    /// Every Failed row back to Retry with attempts, schedule, and error
    /// cleared. Returns the number of rows changed.
    async fn requeue_all_failed(&self) -> Result<u64, OutboxStoreError>;

    /// Same transition for one row. False when the row is missing or not
    /// Failed; the two cases are deliberately indistinguishable.
    async fn requeue_one(&self, id: Uuid) -> Result<bool, OutboxStoreError>;

    async fn count_by_status(&self, status: OutboxStatus) -> Result<u64, OutboxStoreError>;

    /// Creation time of the oldest row still pending (New or Retry).
    async fn oldest_pending_created_at(&self)
    -> Result<Option<DateTime<Utc>>, OutboxStoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<OutboxEvent>, OutboxStoreError>;
}
