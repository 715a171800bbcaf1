// Outbox writer: turns an event envelope into a row ready to persist.
//
// Purpose
// - Serialize the envelope deterministically before any store write, so a
//   serialization failure aborts the whole business operation and neither the
//   aggregate mutation nor the row persists.
//
// Boundaries
// - Persistence happens through the store's combined insert/update-with-event
//   operations, which commit the row atomically with the aggregate write.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::modules::outbox::core::event::OutboxEvent;
use crate::shared::events::envelope::EventEnvelope;

#[derive(Debug, thiserror::Error)]
#[error("failed to serialize event envelope for topic {topic}: {source}")]
pub struct SerializationError {
    pub topic: String,
    #[source]
    pub source: serde_json::Error,
}

pub fn build_event<T: Serialize>(
    topic: &str,
    key: &str,
    envelope: &EventEnvelope<T>,
    now: DateTime<Utc>,
) -> Result<OutboxEvent, SerializationError> {
    let payload = serde_json::to_string(envelope).map_err(|source| SerializationError {
        topic: topic.to_string(),
        source,
    })?;
    Ok(OutboxEvent::new(
        topic,
        key,
        envelope.aggregate_type.clone(),
        envelope.aggregate_id.clone(),
        payload,
        now,
    ))
}
