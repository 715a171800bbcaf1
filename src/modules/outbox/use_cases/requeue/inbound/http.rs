// Operator recovery endpoints for parked outbox rows.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use crate::shared::infrastructure::outbox_store::OutboxStore;
use crate::shell::error::error_response;
use crate::shell::state::AppState;

pub async fn requeue_failed(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.requeue_all_failed().await {
        Ok(count) => Json(json!({ "requeued": count })).into_response(),
        Err(err) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            err.to_string(),
            "/api/v1/outbox/requeue-failed",
        ),
    }
}

pub async fn requeue_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let path = format!("/api/v1/outbox/{id}/requeue");
    match state.store.requeue_one(id).await {
        Ok(true) => Json(json!({ "requeued": id })).into_response(),
        Ok(false) => error_response(
            StatusCode::NOT_FOUND,
            format!("no failed outbox row: {id}"),
            &path,
        ),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), &path),
    }
}

#[cfg(test)]
mod outbox_requeue_http_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use chrono::Utc;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::modules::outbox::core::backoff::BackoffPolicy;
    use crate::modules::outbox::core::event::{OutboxEvent, OutboxStatus};
    use crate::shared::infrastructure::outbox_store::OutboxStore;
    use crate::shell::test_support::make_test_state;

    use super::{requeue_failed, requeue_one};

    fn app(state: crate::shell::state::AppState) -> Router {
        Router::new()
            .route("/api/v1/outbox/requeue-failed", post(requeue_failed))
            .route("/api/v1/outbox/{id}/requeue", post(requeue_one))
            .with_state(state)
    }

    async fn seed_failed_row(store: &crate::shared::infrastructure::in_memory::InMemoryStore) -> OutboxEvent {
        let mut row = OutboxEvent::new(
            "mini.order.created.v1",
            "order-1",
            "order",
            "order-1",
            "{}",
            Utc::now(),
        );
        row.record_failure(
            "forced",
            Utc::now(),
            &BackoffPolicy {
                initial_backoff: chrono::Duration::milliseconds(1),
                multiplier: 2.0,
                max_attempts: 1,
            },
        );
        assert_eq!(row.status, OutboxStatus::Failed);
        store.commit_tick(vec![row.clone()]).await.unwrap();
        row
    }

    #[tokio::test]
    async fn it_should_requeue_all_failed_rows_and_report_the_count() {
        let state = make_test_state();
        seed_failed_row(&state.store).await;
        seed_failed_row(&state.store).await;
        let store = state.store.clone();

        let response = app(state)
            .oneshot(
                Request::post("/api/v1/outbox/requeue-failed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["requeued"], 2);
        assert_eq!(store.count_by_status(OutboxStatus::Failed).await.unwrap(), 0);
        assert_eq!(store.count_by_status(OutboxStatus::Retry).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn it_should_requeue_a_single_failed_row() {
        let state = make_test_state();
        let row = seed_failed_row(&state.store).await;
        let store = state.store.clone();

        let response = app(state)
            .oneshot(
                Request::post(format!("/api/v1/outbox/{}/requeue", row.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let updated = store.get(row.id).await.unwrap().unwrap();
        assert_eq!(updated.status, OutboxStatus::Retry);
        assert_eq!(updated.attempts, 0);
        assert!(updated.last_error.is_none());
    }

    #[tokio::test]
    async fn it_should_return_404_for_a_missing_or_non_failed_row() {
        let state = make_test_state();
        let app = app(state);

        let missing = app
            .clone()
            .oneshot(
                Request::post(format!("/api/v1/outbox/{}/requeue", uuid::Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
