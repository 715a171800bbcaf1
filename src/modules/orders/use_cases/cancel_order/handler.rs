// Cancel order use case: terminal-state guard plus version-guarded write.
//
// Responsibilities
// - Reject cancellation of terminal orders before touching storage.
// - Write back the mutated order only if the version read at the start still
//   matches, appending the cancelled event in the same atomic unit. The loser
//   of a race gets a typed Conflict and writes nothing.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::modules::orders::core::events::{
    AGGREGATE_ORDER, EVENT_ORDER_CANCELLED, OrderCancelledData, topics,
};
use crate::modules::orders::core::order::Order;
use crate::modules::orders::use_cases::errors::ApplicationError;
use crate::modules::outbox::core::writer::build_event;
use crate::shared::events::envelope::EventEnvelope;
use crate::shared::infrastructure::order_store::OrderStore;

pub struct CancelOrderHandler<TStore>
where
    TStore: OrderStore + Send + Sync + 'static,
{
    store: Arc<TStore>,
}

impl<TStore> CancelOrderHandler<TStore>
where
    TStore: OrderStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, id: Uuid) -> Result<Order, ApplicationError> {
        let now = Utc::now();
        let existing = self.store.get(id).await?;
        existing
            .ensure_cancellable()
            .map_err(|err| ApplicationError::Domain(err.to_string()))?;

        let expected_version = existing.version;
        let mut cancelled = existing;
        cancelled.cancel(now);

        let envelope = EventEnvelope::new(
            EVENT_ORDER_CANCELLED,
            AGGREGATE_ORDER,
            cancelled.id.to_string(),
            Uuid::now_v7().to_string(),
            OrderCancelledData {
                order_id: cancelled.id,
                cancelled_at: now,
                reason: None,
            },
            now,
        );
        let event = build_event(
            topics::ORDER_CANCELLED,
            &cancelled.id.to_string(),
            &envelope,
            now,
        )?;

        self.store
            .update_with_event(cancelled.clone(), expected_version, event)
            .await?;
        tracing::debug!(order_id = %cancelled.id, "order cancelled");
        Ok(cancelled)
    }
}
