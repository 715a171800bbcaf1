// Port for order persistence, including the optimistic-concurrency guard.
//
// Purpose
// - Describe what the order use cases need from storage without implementing
//   it: reads, paged listing, and writes that commit the aggregate change and
//   its outbox row as one atomic unit.
//
// Boundaries
// - Adapters implement this trait. The in-memory adapter lives in
//   `shared::infrastructure::in_memory`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::modules::orders::core::order::{Customer, Order, OrderStatus};
use crate::modules::outbox::core::event::OutboxEvent;

#[derive(Debug, Error)]
pub enum OrderStoreError {
    #[error("order not found: {0}")]
    NotFound(Uuid),

    #[error("version mismatch for order {order_id}: expected {expected}, actual {actual}")]
    VersionMismatch {
        order_id: Uuid,
        expected: i64,
        actual: i64,
    },

    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub items: Vec<Order>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Order, OrderStoreError>;

    /// Orders sorted by creation time ascending, optionally filtered by status.
    async fn list(
        &self,
        status: Option<OrderStatus>,
        page: u32,
        size: u32,
    ) -> Result<OrderPage, OrderStoreError>;

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, OrderStoreError>;

    /// Inserts the customer unless one with the same id already exists.
    async fn ensure_customer(&self, customer: Customer) -> Result<(), OrderStoreError>;

    /// Persists a new order and its outbox row in one atomic unit: both
    /// commit or neither does.
    async fn insert_with_event(
        &self,
        order: Order,
        event: OutboxEvent,
    ) -> Result<(), OrderStoreError>;

    /// Writes back a mutated order only if the stored version still equals
    /// `expected_version`, and appends the outbox row in the same atomic
    /// unit. The order passed in already carries the bumped version.
    async fn update_with_event(
        &self,
        order: Order,
        expected_version: i64,
        event: OutboxEvent,
    ) -> Result<(), OrderStoreError>;
}
