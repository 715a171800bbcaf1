use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use crate::modules::orders::adapters::response::OrderResponse;
use crate::shell::error::application_error_response;
use crate::shell::state::AppState;

pub async fn handle(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let path = format!("/api/v1/orders/{id}/cancel");
    match state.cancel_handler.handle(id).await {
        Ok(order) => Json(OrderResponse::from_order(&order)).into_response(),
        Err(err) => application_error_response(err, &path),
    }
}
