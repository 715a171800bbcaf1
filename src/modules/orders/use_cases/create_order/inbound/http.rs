use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::orders::adapters::response::OrderResponse;
use crate::modules::orders::use_cases::create_order::command::{CreateOrder, CreateOrderItem};
use crate::shell::error::{application_error_response, error_response};
use crate::shell::state::AppState;

const PATH: &str = "/api/v1/orders";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    pub customer_id: Uuid,
    pub currency: String,
    pub items: Vec<OrderItemBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemBody {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

fn validate(body: &CreateOrderBody) -> Result<(), String> {
    if body.currency.chars().count() != 3 {
        return Err("currency must be exactly 3 characters".to_string());
    }
    if body.items.is_empty() {
        return Err("items must not be empty".to_string());
    }
    for item in &body.items {
        if item.sku.trim().is_empty() {
            return Err("item sku must not be blank".to_string());
        }
        if item.name.trim().is_empty() {
            return Err("item name must not be blank".to_string());
        }
        if item.quantity == 0 {
            return Err("item quantity must be positive".to_string());
        }
        if item.unit_price < 0.0 || !item.unit_price.is_finite() {
            return Err("item unitPrice must be zero or positive".to_string());
        }
    }
    Ok(())
}

pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<CreateOrderBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => {
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, rejection.to_string(), PATH);
        }
    };

    if let Err(message) = validate(&body) {
        return error_response(StatusCode::BAD_REQUEST, message, PATH);
    }

    let command = CreateOrder {
        customer_id: body.customer_id,
        currency: body.currency,
        items: body
            .items
            .into_iter()
            .map(|item| CreateOrderItem {
                sku: item.sku,
                name: item.name,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect(),
    };

    match state.create_handler.handle(command).await {
        Ok(order) => (
            StatusCode::CREATED,
            [(header::LOCATION, format!("{PATH}/{}", order.id))],
            Json(OrderResponse::from_order(&order)),
        )
            .into_response(),
        Err(err) => application_error_response(err, PATH),
    }
}
