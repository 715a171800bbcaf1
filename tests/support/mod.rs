// Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use orders::modules::orders::core::events::{AGGREGATE_ORDER, topics};
use orders::modules::orders::core::order::{Order, OrderItem};
use orders::modules::outbox::core::backoff::BackoffPolicy;
use orders::modules::outbox::core::event::OutboxEvent;
use orders::modules::outbox::relay::scheduler::{OutboxRelay, RelayConfig};
use orders::shared::infrastructure::event_bus::{EventPublisher, PublishError};
use orders::shared::infrastructure::in_memory::InMemoryStore;
use orders::shared::infrastructure::order_store::OrderStore;
use orders::shared::infrastructure::outbox_store::OutboxStore;
use orders::shell::state::AppState;

/// Publisher double that records every publish and fails on demand.
pub struct RecordingPublisher {
    /// Number of leading calls that fail; u32::MAX means always fail.
    failures: u32,
    calls: AtomicU32,
    /// Optional pause per publish, to hold a tick open.
    delay: Option<Duration>,
    published: Mutex<Vec<(String, String, String)>>,
}

impl RecordingPublisher {
    pub fn succeeding() -> Self {
        Self::failing_first(0)
    }

    pub fn always_failing() -> Self {
        Self::failing_first(u32::MAX)
    }

    pub fn failing_first(failures: u32) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
            delay: None,
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn published(&self) -> Vec<(String, String, String)> {
        self.published.lock().unwrap().clone()
    }

    pub fn publish_count_for_key(&self, key: &str) -> usize {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, k, _)| k == key)
            .count()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), PublishError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(PublishError::Unreachable("broker down".to_string()));
        }
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), key.to_string(), payload.to_string()));
        Ok(())
    }
}

/// Backoff with zero delay so every retry is due on the next tick.
pub fn immediate_backoff(max_attempts: u32) -> BackoffPolicy {
    BackoffPolicy {
        initial_backoff: chrono::Duration::milliseconds(0),
        multiplier: 2.0,
        max_attempts,
    }
}

pub fn relay_config(batch_size: usize, max_attempts: u32) -> RelayConfig {
    RelayConfig {
        batch_size,
        interval: Duration::from_millis(10),
        backoff: immediate_backoff(max_attempts),
    }
}

pub fn make_relay(
    store: Arc<InMemoryStore>,
    publisher: Arc<RecordingPublisher>,
    config: RelayConfig,
) -> OutboxRelay<InMemoryStore> {
    OutboxRelay::new(store, publisher, config)
}

pub fn make_app_state(store: Arc<InMemoryStore>) -> AppState {
    let relay = Arc::new(OutboxRelay::new(
        store.clone(),
        Arc::new(RecordingPublisher::succeeding()),
        RelayConfig::default(),
    ));
    AppState::new(store, relay)
}

pub async fn seed_outbox_row(store: &InMemoryStore, key: &str) -> OutboxEvent {
    let row = OutboxEvent::new(
        topics::ORDER_CREATED,
        key,
        AGGREGATE_ORDER,
        key,
        "{}",
        Utc::now(),
    );
    store.commit_tick(vec![row.clone()]).await.unwrap();
    row
}

pub async fn seed_order(store: &InMemoryStore) -> Order {
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
