// Event payloads emitted by order mutations, plus the topics they route to.
//
// Purpose
// - Define the `data` section of the event envelope for each order event.
//
// Boundaries
// - Wire shape only. Construction happens in the use case handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::orders::core::order::Order;

pub mod topics {
    pub const ORDER_CREATED: &str = "mini.order.created.v1";
    pub const ORDER_CANCELLED: &str = "mini.order.cancelled.v1";
}

pub const EVENT_ORDER_CREATED: &str = "order.created";
pub const EVENT_ORDER_CANCELLED: &str = "order.cancelled";
pub const AGGREGATE_ORDER: &str = "order";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedItem {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedData {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub currency: String,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderCreatedItem>,
}

impl OrderCreatedData {
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id,
            customer_id: order.customer_id,
            currency: order.currency.clone(),
            total: order.total,
            created_at: order.created_at,
            items: order
                .items
                .iter()
                .map(|item| OrderCreatedItem {
                    sku: item.sku.clone(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancelledData {
    pub order_id: Uuid,
    pub cancelled_at: DateTime<Utc>,
    pub reason: Option<String>,
}
