use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use crate::modules::orders::adapters::response::OrderResponse;
use crate::modules::orders::use_cases::errors::ApplicationError;
use crate::shared::infrastructure::order_store::OrderStore;
use crate::shell::error::application_error_response;
use crate::shell::state::AppState;

pub async fn handle(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let path = format!("/api/v1/orders/{id}");
    match state.store.get(id).await {
        Ok(order) => Json(OrderResponse::from_order(&order)).into_response(),
        Err(err) => application_error_response(ApplicationError::from(err), &path),
    }
}

#[cfg(test)]
mod get_order_http_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::shell::test_support::{make_test_state, seed_order};

    use super::handle;

    fn app(state: crate::shell::state::AppState) -> Router {
        Router::new()
            .route("/api/v1/orders/{id}", get(handle))
            .with_state(state)
    }

    #[tokio::test]
    async fn it_should_return_the_order_by_id() {
        let state = make_test_state();
        let order = seed_order(&state.store).await;

        let response = app(state)
            .oneshot(
                Request::get(format!("/api/v1/orders/{}", order.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["id"], order.id.to_string());
    }

    #[tokio::test]
    async fn it_should_return_404_for_an_unknown_id() {
        let response = app(make_test_state())
            .oneshot(
                Request::get(format!("/api/v1/orders/{}", uuid::Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
