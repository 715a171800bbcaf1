// Publisher that only logs. Default transport for local runs.

use async_trait::async_trait;

use crate::shared::infrastructure::event_bus::{EventPublisher, PublishError};

#[derive(Debug, Default)]
pub struct LogPublisher;

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), PublishError> {
        tracing::info!(topic, key, bytes = payload.len(), "publishing event");
        Ok(())
    }
}
