// Order aggregate and its invariants.
//
// Purpose
// - Hold the business state whose mutations produce outbox events.
//
// Responsibilities
// - Compute totals from items at construction time.
// - Enforce the terminal-status rule before any state-changing mutation.
// - Stamp timestamps and bump the version explicitly in mutation functions.
//
// Boundaries
// - No persistence here. The version token is checked by the store on write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Cancelled,
    Fulfilled,
    Refunded,
}

impl OrderStatus {
    /// Terminal statuses reject further state-changing mutation.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Created)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Refunded => "refunded",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "created" => Some(OrderStatus::Created),
            "cancelled" => Some(OrderStatus::Cancelled),
            "fulfilled" => Some(OrderStatus::Fulfilled),
            "refunded" => Some(OrderStatus::Refunded),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OrderRuleError {
    #[error("cannot cancel order in status: {0}")]
    NotCancellable(OrderStatus),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl OrderItem {
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        quantity: u32,
        unit_price: f64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            sku: sku.into(),
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub currency: String,
    pub total: f64,
    pub items: Vec<OrderItem>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        customer_id: Uuid,
        currency: impl Into<String>,
        items: Vec<OrderItem>,
        now: DateTime<Utc>,
    ) -> Self {
        let total = items.iter().map(OrderItem::line_total).sum();
        Self {
            id: Uuid::now_v7(),
            customer_id,
            status: OrderStatus::Created,
            currency: currency.into(),
            total,
            items,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn ensure_cancellable(&self) -> Result<(), OrderRuleError> {
        if self.status.is_terminal() {
            return Err(OrderRuleError::NotCancellable(self.status));
        }
        Ok(())
    }

    /// Marks the order cancelled and bumps the version token.
    /// The caller passes the pre-mutation version to the store as the guard.
    pub fn cancel(&mut self, now: DateTime<Utc>) {
        self.status = OrderStatus::Cancelled;
        self.version += 1;
        self.updated_at = now;
    }
}

/// Minimal customer record, auto-provisioned on first order.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn provisional(id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: format!("{id}@demo.local"),
            name: "Demo Customer".to_string(),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod order_tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn order() -> Order {
        Order::new(
            Uuid::now_v7(),
            "USD",
            vec![
                OrderItem::new("SKU-1", "Keyboard", 2, 19.99),
                OrderItem::new("SKU-2", "Mouse", 1, 10.00),
            ],
            Utc::now(),
        )
    }

    #[rstest]
    fn it_should_compute_the_total_from_line_totals(order: Order) {
        assert_eq!(order.total, 49.98);
    }

    #[rstest]
    fn it_should_start_at_version_one_with_created_status(order: Order) {
        assert_eq!(order.version, 1);
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.created_at, order.updated_at);
    }

    #[rstest]
    fn it_should_bump_version_and_stamp_updated_at_on_cancel(mut order: Order) {
        let later = order.created_at + chrono::Duration::seconds(5);
        order.cancel(later);
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.version, 2);
        assert_eq!(order.updated_at, later);
    }

    #[rstest]
    fn it_should_reject_cancelling_a_terminal_order(mut order: Order) {
        order.cancel(Utc::now());
        assert_eq!(
            order.ensure_cancellable(),
            Err(OrderRuleError::NotCancellable(OrderStatus::Cancelled))
        );
    }

    #[rstest]
    #[case("created", Some(OrderStatus::Created))]
    #[case("CANCELLED", Some(OrderStatus::Cancelled))]
    #[case("Fulfilled", Some(OrderStatus::Fulfilled))]
    #[case("refunded", Some(OrderStatus::Refunded))]
    #[case("shipped", None)]
    fn it_should_parse_status_names(#[case] input: &str, #[case] expected: Option<OrderStatus>) {
        assert_eq!(OrderStatus::parse(input), expected);
    }

    #[rstest]
    fn it_should_treat_only_created_as_non_terminal() {
        assert!(!OrderStatus::Created.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Fulfilled.is_terminal());
        assert!(OrderStatus::Refunded.is_terminal());
    }
}
