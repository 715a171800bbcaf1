// Outbox relay: drains due rows to the event transport on a fixed interval.
//
// Responsibilities
// - One tick at a time per instance; concurrent instances are arbitrated by
//   the store's claim-and-skip due scan.
// - Within a tick, rows are published sequentially; one row's failure never
//   aborts its siblings. The whole tick's updates commit together, which is
//   what makes delivery at-least-once rather than exactly-once.
// - Own the lifecycle: an explicit run loop with a shutdown signal, observed
//   between ticks, never mid-tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::modules::outbox::core::backoff::{BackoffDecision, BackoffPolicy};
use crate::modules::outbox::core::event::OutboxStatus;
use crate::modules::outbox::relay::metrics::{RelayMetrics, RelayMetricsSnapshot};
use crate::shared::infrastructure::event_bus::EventPublisher;
use crate::shared::infrastructure::outbox_store::{OutboxStore, OutboxStoreError};

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub batch_size: usize,
    pub interval: Duration,
    pub backoff: BackoffPolicy,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            interval: Duration::from_millis(1_000),
            backoff: BackoffPolicy {
                initial_backoff: chrono::Duration::milliseconds(500),
                multiplier: 2.0,
                max_attempts: 8,
            },
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub fetched: usize,
    pub sent: usize,
    pub retried: usize,
    pub failed: usize,
}

pub struct OutboxRelay<TStore>
where
    TStore: OutboxStore + 'static,
{
    store: Arc<TStore>,
    publisher: Arc<dyn EventPublisher>,
    config: RelayConfig,
    metrics: RelayMetrics,
}

impl<TStore> OutboxRelay<TStore>
where
    TStore: OutboxStore + 'static,
{
    pub fn new(store: Arc<TStore>, publisher: Arc<dyn EventPublisher>, config: RelayConfig) -> Self {
        Self {
            store,
            publisher,
            config,
            metrics: RelayMetrics::default(),
        }
    }

    pub fn metrics_snapshot(&self) -> RelayMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// One relay pass: fetch a due batch, publish row by row, commit the
    /// batch's updates together, refresh the counters.
    pub async fn tick(&self) -> Result<TickSummary, OutboxStoreError> {
        let batch = self
            .store
            .fetch_due_batch(Utc::now(), self.config.batch_size)
            .await?;
        let mut summary = TickSummary {
            fetched: batch.len(),
            ..TickSummary::default()
        };

        let mut updates = Vec::with_capacity(batch.len());
        for mut row in batch {
            match self
                .publisher
                .publish(&row.topic, &row.key, &row.payload)
                .await
            {
                Ok(()) => {
                    row.mark_sent(Utc::now());
                    summary.sent += 1;
                }
                Err(err) => {
                    let decision =
                        row.record_failure(&err.to_string(), Utc::now(), &self.config.backoff);
                    match decision {
                        BackoffDecision::Retry { .. } => summary.retried += 1,
                        BackoffDecision::Failed { .. } => summary.failed += 1,
                    }
                    warn!(
                        topic = %row.topic,
                        key = %row.key,
                        attempt = row.attempts,
                        status = ?row.status,
                        error = %err,
                        "outbox publish failure"
                    );
                }
            }
            updates.push(row);
        }

        let ids: Vec<Uuid> = updates.iter().map(|row| row.id).collect();
        if let Err(err) = self.store.commit_tick(updates).await {
            let _ = self.store.release_batch(&ids).await;
            return Err(err);
        }

        self.refresh_metrics().await?;
        if summary.fetched > 0 {
            debug!(
                fetched = summary.fetched,
                sent = summary.sent,
                retried = summary.retried,
                failed = summary.failed,
                "outbox relay tick"
            );
        }
        Ok(summary)
    }

    async fn refresh_metrics(&self) -> Result<(), OutboxStoreError> {
        let pending = self.store.count_by_status(OutboxStatus::New).await?
            + self.store.count_by_status(OutboxStatus::Retry).await?;
        let failed = self.store.count_by_status(OutboxStatus::Failed).await?;
        let oldest_age_seconds = self
            .store
            .oldest_pending_created_at()
            .await?
            .map(|created_at| (Utc::now() - created_at).num_seconds().max(0) as u64)
            .unwrap_or(0);
        self.metrics.record(pending, failed, oldest_age_seconds);
        Ok(())
    }

    /// Ticks until the shutdown signal flips. A started tick always runs to
    /// completion; the signal is only observed between ticks.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!(
            batch_size = self.config.batch_size,
            interval_ms = self.config.interval.as_millis() as u64,
            "outbox relay started"
        );
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.tick().await {
                        warn!(error = %err, "outbox relay tick failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("outbox relay stopped");
    }
}
