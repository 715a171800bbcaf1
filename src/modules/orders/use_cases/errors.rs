// Application-level error taxonomy shared by the order use cases.
//
// Conflict is a typed variant, not a caught exception: callers branch on it
// and retry the whole read-mutate-write if they want to.

use thiserror::Error;
use uuid::Uuid;

use crate::modules::outbox::core::writer::SerializationError;
use crate::shared::infrastructure::order_store::OrderStoreError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("order not found: {0}")]
    NotFound(Uuid),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("domain rejected: {0}")]
    Domain(String),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error("unexpected: {0}")]
    Unexpected(String),
}

impl From<OrderStoreError> for ApplicationError {
    fn from(err: OrderStoreError) -> Self {
        match err {
            OrderStoreError::NotFound(id) => ApplicationError::NotFound(id),
            OrderStoreError::VersionMismatch { .. } => ApplicationError::Conflict(err.to_string()),
            OrderStoreError::Backend(message) => ApplicationError::Unexpected(message),
        }
    }
}
