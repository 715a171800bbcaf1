// Shared fixtures for the inline HTTP handler tests.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::modules::orders::core::events::{AGGREGATE_ORDER, topics};
use crate::modules::orders::core::order::{Order, OrderItem};
use crate::modules::outbox::core::event::OutboxEvent;
use crate::modules::outbox::relay::scheduler::{OutboxRelay, RelayConfig};
use crate::shared::infrastructure::event_bus::LogPublisher;
use crate::shared::infrastructure::in_memory::InMemoryStore;
use crate::shared::infrastructure::order_store::OrderStore;
use crate::shell::state::AppState;

pub fn make_test_state() -> AppState {
    let store = Arc::new(InMemoryStore::new());
    let relay = Arc::new(OutboxRelay::new(
        store.clone(),
        Arc::new(LogPublisher),
        RelayConfig::default(),
    ));
    AppState::new(store, relay)
}

pub async fn seed_order(store: &Arc<InMemoryStore>) -> Order {
    let now = Utc::now();
    let order = Order::new(
        Uuid::now_v7(),
        "USD",
        vec![OrderItem::new("SKU-1", "Keyboard", 2, 19.99)],
        now,
    );
    let row = OutboxEvent::new(
        topics::ORDER_CREATED,
        order.id.to_string(),
        AGGREGATE_ORDER,
        order.id.to_string(),
        "{}",
        now,
    );
    store
        .insert_with_event(order.clone(), row)
        .await
        .expect("seed order failed");
    order
}
