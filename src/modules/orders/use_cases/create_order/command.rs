// Command to create an order.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub customer_id: Uuid,
    pub currency: String,
    pub items: Vec<CreateOrderItem>,
}

#[derive(Debug, Clone)]
pub struct CreateOrderItem {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}
