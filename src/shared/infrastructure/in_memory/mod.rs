// In memory implementation of the OrderStore and OutboxStore ports.
//
// Purpose
// - Support the relay, the use case handlers, and the tests without a
//   database.
//
// Responsibilities
// - One state behind one lock, so an aggregate write and its outbox row
//   commit atomically.
// - Enforce optimistic concurrency by comparing the stored order version.
// - Due-batch selection claims its rows: a concurrent identical query skips
//   claimed rows instead of blocking. Claims release on commit_tick or
//   release_batch.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::modules::orders::core::order::{Customer, Order, OrderStatus};
use crate::modules::outbox::core::event::{OutboxEvent, OutboxStatus};
use crate::shared::infrastructure::order_store::{OrderPage, OrderStore, OrderStoreError};
use crate::shared::infrastructure::outbox_store::{OutboxStore, OutboxStoreError};

#[derive(Default)]
struct DbState {
    orders: HashMap<Uuid, Order>,
    customers: HashMap<Uuid, Customer>,
    outbox: HashMap<Uuid, OutboxEvent>,
    claimed: HashSet<Uuid>,
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<DbState>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every operation fail with a backend error, for failure-path tests.
    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), String> {
        if self.offline.load(Ordering::SeqCst) {
            return Err("store offline".to_string());
        }
        Ok(())
    }

    /// Test/inspection helper: every outbox row, unordered.
    pub async fn all_outbox_rows(&self) -> Vec<OutboxEvent> {
        self.inner.lock().await.outbox.values().cloned().collect()
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn get(&self, id: Uuid) -> Result<Order, OrderStoreError> {
        self.check_online().map_err(OrderStoreError::Backend)?;
        let guard = self.inner.lock().await;
        guard
            .orders
            .get(&id)
            .cloned()
            .ok_or(OrderStoreError::NotFound(id))
    }

    async fn list(
        &self,
        status: Option<OrderStatus>,
        page: u32,
        size: u32,
    ) -> Result<OrderPage, OrderStoreError> {
        self.check_online().map_err(OrderStoreError::Backend)?;
        let guard = self.inner.lock().await;
        let mut matching: Vec<Order> = guard
            .orders
            .values()
            .filter(|order| status.is_none_or(|s| order.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let total_elements = matching.len() as u64;
        let offset = page as usize * size as usize;
        let items = matching
            .into_iter()
            .skip(offset)
            .take(size as usize)
            .collect();
        Ok(OrderPage {
            items,
            page,
            size,
            total_elements,
        })
    }

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, OrderStoreError> {
        self.check_online().map_err(OrderStoreError::Backend)?;
        let guard = self.inner.lock().await;
        Ok(guard.customers.get(&id).cloned())
    }

    async fn ensure_customer(&self, customer: Customer) -> Result<(), OrderStoreError> {
        self.check_online().map_err(OrderStoreError::Backend)?;
        let mut guard = self.inner.lock().await;
        guard.customers.entry(customer.id).or_insert(customer);
        Ok(())
    }

    async fn insert_with_event(
        &self,
        order: Order,
        event: OutboxEvent,
    ) -> Result<(), OrderStoreError> {
        self.check_online().map_err(OrderStoreError::Backend)?;
        let mut guard = self.inner.lock().await;
        guard.orders.insert(order.id, order);
        guard.outbox.insert(event.id, event);
        Ok(())
    }

    async fn update_with_event(
        &self,
        order: Order,
        expected_version: i64,
        event: OutboxEvent,
    ) -> Result<(), OrderStoreError> {
        self.check_online().map_err(OrderStoreError::Backend)?;
        let mut guard = self.inner.lock().await;
        let order_id = order.id;
        let actual = guard
            .orders
            .get(&order_id)
            .map(|stored| stored.version)
            .ok_or(OrderStoreError::NotFound(order_id))?;
        if actual != expected_version {
            return Err(OrderStoreError::VersionMismatch {
                order_id,
                expected: expected_version,
                actual,
            });
        }
        guard.orders.insert(order_id, order);
        guard.outbox.insert(event.id, event);
        Ok(())
    }
}

#[async_trait]
impl OutboxStore for InMemoryStore {
    async fn fetch_due_batch(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<OutboxEvent>, OutboxStoreError> {
        self.check_online().map_err(OutboxStoreError::Backend)?;
        let mut guard = self.inner.lock().await;
        let mut due: Vec<OutboxEvent> = guard
            .outbox
            .values()
            .filter(|row| row.is_due(now) && !guard.claimed.contains(&row.id))
            .cloned()
            .collect();
        due.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        due.truncate(limit);
        for row in &due {
            guard.claimed.insert(row.id);
        }
        Ok(due)
    }

    async fn commit_tick(&self, updates: Vec<OutboxEvent>) -> Result<(), OutboxStoreError> {
        self.check_online().map_err(OutboxStoreError::Backend)?;
        let mut guard = self.inner.lock().await;
        for row in updates {
            guard.claimed.remove(&row.id);
            guard.outbox.insert(row.id, row);
        }
        Ok(())
    }

    async fn release_batch(&self, ids: &[Uuid]) -> Result<(), OutboxStoreError> {
        let mut guard = self.inner.lock().await;
        for id in ids {
            guard.claimed.remove(id);
        }
        Ok(())
    }

    async fn requeue_all_failed(&self) -> Result<u64, OutboxStoreError> {
        self.check_online().map_err(OutboxStoreError::Backend)?;
        let now = Utc::now();
        let mut guard = self.inner.lock().await;
        let mut requeued = 0;
        for row in guard.outbox.values_mut() {
            if row.requeue(now) {
                requeued += 1;
            }
        }
        Ok(requeued)
    }

    async fn requeue_one(&self, id: Uuid) -> Result<bool, OutboxStoreError> {
        self.check_online().map_err(OutboxStoreError::Backend)?;
        let now = Utc::now();
        let mut guard = self.inner.lock().await;
        Ok(guard.outbox.get_mut(&id).is_some_and(|row| row.requeue(now)))
    }

    async fn count_by_status(&self, status: OutboxStatus) -> Result<u64, OutboxStoreError> {
        self.check_online().map_err(OutboxStoreError::Backend)?;
        let guard = self.inner.lock().await;
        Ok(guard
            .outbox
            .values()
            .filter(|row| row.status == status)
            .count() as u64)
    }

    async fn oldest_pending_created_at(
        &self,
    ) -> Result<Option<DateTime<Utc>>, OutboxStoreError> {
        self.check_online().map_err(OutboxStoreError::Backend)?;
        let guard = self.inner.lock().await;
        Ok(guard
            .outbox
            .values()
            .filter(|row| matches!(row.status, OutboxStatus::New | OutboxStatus::Retry))
            .map(|row| row.created_at)
            .min())
    }

    async fn get(&self, id: Uuid) -> Result<Option<OutboxEvent>, OutboxStoreError> {
        self.check_online().map_err(OutboxStoreError::Backend)?;
        let guard = self.inner.lock().await;
        Ok(guard.outbox.get(&id).cloned())
    }
}
