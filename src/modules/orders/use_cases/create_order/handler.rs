// Create order use case orchestrates the write flow.
//
// Responsibilities
// - Auto-provision a minimal customer record for unknown customer ids.
// - Assemble the order, serialize its envelope, and persist both the order
//   and the outbox row as one atomic unit.
// - Fail the whole operation on serialization errors, before anything is
//   written.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::modules::orders::core::events::{
    AGGREGATE_ORDER, EVENT_ORDER_CREATED, OrderCreatedData, topics,
};
use crate::modules::orders::core::order::{Customer, Order, OrderItem};
use crate::modules::orders::use_cases::create_order::command::CreateOrder;
use crate::modules::orders::use_cases::errors::ApplicationError;
use crate::modules::outbox::core::writer::build_event;
use crate::shared::events::envelope::EventEnvelope;
use crate::shared::infrastructure::order_store::OrderStore;

pub struct CreateOrderHandler<TStore>
where
    TStore: OrderStore + Send + Sync + 'static,
{
    store: Arc<TStore>,
}

impl<TStore> CreateOrderHandler<TStore>
where
    TStore: OrderStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, command: CreateOrder) -> Result<Order, ApplicationError> {
        let now = Utc::now();

        if self.store.find_customer(command.customer_id).await?.is_none() {
            self.store
                .ensure_customer(Customer::provisional(command.customer_id, now))
                .await?;
        }

        let items = command
            .items
            .into_iter()
            .map(|item| OrderItem::new(item.sku, item.name, item.quantity, item.unit_price))
            .collect();
        let order = Order::new(command.customer_id, command.currency, items, now);

        let envelope = EventEnvelope::new(
            EVENT_ORDER_CREATED,
            AGGREGATE_ORDER,
            order.id.to_string(),
            Uuid::now_v7().to_string(),
            OrderCreatedData::from_order(&order),
            now,
        );
        let event = build_event(topics::ORDER_CREATED, &order.id.to_string(), &envelope, now)?;

        self.store.insert_with_event(order.clone(), event).await?;
        tracing::debug!(order_id = %order.id, total = order.total, "order created");
        Ok(order)
    }
}
