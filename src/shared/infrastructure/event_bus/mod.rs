// Port for the event transport, plus the bundled adapters.
//
// Purpose
// - One blocking publish call per outbox row. An adapter may retry internally
//   a bounded number of times; when those retries are exhausted it reports a
//   single PublishError, which the relay counts as one failed attempt.

use async_trait::async_trait;
use thiserror::Error;

pub mod http_publisher;
pub mod log_publisher;

pub use http_publisher::HttpEventPublisher;
pub use log_publisher::LogPublisher;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("transport rejected message on topic {topic}: {message}")]
    Rejected { topic: String, message: String },

    #[error("transport unreachable: {0}")]
    Unreachable(String),
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), PublishError>;
}
