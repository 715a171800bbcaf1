use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::modules::orders::use_cases::cancel_order::inbound::http as cancel_http;
use crate::modules::orders::use_cases::create_order::inbound::http as create_http;
use crate::modules::orders::use_cases::get_order::inbound::http as get_http;
use crate::modules::orders::use_cases::list_orders::inbound::http as list_http;
use crate::modules::outbox::use_cases::requeue::inbound::http as requeue_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/orders", post(create_http::handle).get(list_http::handle))
        .route("/api/v1/orders/{id}", get(get_http::handle))
        .route("/api/v1/orders/{id}/cancel", patch(cancel_http::handle))
        .route(
            "/api/v1/outbox/requeue-failed",
            post(requeue_http::requeue_failed),
        )
        .route("/api/v1/outbox/{id}/requeue", post(requeue_http::requeue_one))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reports the relay's view of the outbox backlog, refreshed once per tick.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let outbox = state.relay.metrics_snapshot();
    let status = if outbox.failed > 0 { "degraded" } else { "up" };
    Json(json!({
        "status": status,
        "outbox": {
            "pending": outbox.pending,
            "failed": outbox.failed,
            "oldestAgeSeconds": outbox.oldest_age_seconds,
        }
    }))
}
