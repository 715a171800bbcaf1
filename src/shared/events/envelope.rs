// Event envelope: the self-describing wrapper around an event's business data.
//
// Purpose
// - Give every published event an identity, a type/version, timestamps, and a
//   correlation id, independent of the transport.
//
// Boundaries
// - Serialization to the stored payload happens in the outbox writer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ENVELOPE_VERSION: &str = "v1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope<T> {
    pub event_id: Uuid,
    #[serde(rename = "type")]
    pub event_type: String,
    pub version: String,
    pub occurred_at: DateTime<Utc>,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub trace_id: String,
    pub data: T,
}

impl<T> EventEnvelope<T> {
    pub fn new(
        event_type: impl Into<String>,
        aggregate_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        trace_id: impl Into<String>,
        data: T,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            event_type: event_type.into(),
            version: ENVELOPE_VERSION.to_string(),
            occurred_at: now,
            aggregate_type: aggregate_type.into(),
            aggregate_id: aggregate_id.into(),
            trace_id: trace_id.into(),
            data,
        }
    }
}
