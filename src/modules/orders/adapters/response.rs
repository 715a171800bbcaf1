// Maps the order aggregate into its HTTP response shape.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::modules::orders::core::order::{Order, OrderItem};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: String,
    pub currency: String,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id,
            customer_id: order.customer_id,
            status: order.status.as_str().to_string(),
            currency: order.currency.clone(),
            total: order.total,
            created_at: order.created_at,
            updated_at: order.updated_at,
            items: order.items.iter().map(item_response).collect(),
        }
    }
}

fn item_response(item: &OrderItem) -> OrderItemResponse {
    OrderItemResponse {
        id: item.id,
        sku: item.sku.clone(),
        name: item.name.clone(),
        quantity: item.quantity,
        unit_price: item.unit_price,
        line_total: item.line_total(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}
