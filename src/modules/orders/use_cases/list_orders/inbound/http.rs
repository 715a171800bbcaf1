use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::modules::orders::adapters::response::{OrderResponse, PageResponse};
use crate::modules::orders::core::order::OrderStatus;
use crate::modules::orders::use_cases::errors::ApplicationError;
use crate::shared::infrastructure::order_store::OrderStore;
use crate::shell::error::{application_error_response, error_response};
use crate::shell::state::AppState;

const PATH: &str = "/api/v1/orders";
const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

pub async fn handle(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => match OrderStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("unknown status: {raw}"),
                    PATH,
                );
            }
        },
    };
    let page = query.page.unwrap_or(0);
    let size = match query.size.unwrap_or(DEFAULT_PAGE_SIZE) {
        0 => DEFAULT_PAGE_SIZE,
        size => size,
    };

    match state.store.list(status, page, size).await {
        Ok(result) => {
            let total_pages = result.total_elements.div_ceil(u64::from(size));
            Json(PageResponse {
                items: result
                    .items
                    .iter()
                    .map(OrderResponse::from_order)
                    .collect(),
                page: result.page,
                size: result.size,
                total_elements: result.total_elements,
                total_pages,
            })
            .into_response()
        }
        Err(err) => application_error_response(ApplicationError::from(err), PATH),
    }
}
