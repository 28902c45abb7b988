//! HTTP request handlers for the mock server.

pub mod auth;
pub mod chargehistory;
pub mod chargers;

pub use auth::*;
pub use chargehistory::*;
pub use chargers::*;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::mock_server::state::MockState;

/// List envelope used by every paged endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListResponse<T> {
    pub pages: usize,
    pub data: Vec<T>,
}

/// Reject the request unless it carries the active bearer token.
pub(crate) fn authorize(state: &mut MockState, headers: &HeaderMap) -> Result<(), Response> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if state.authorize(header) {
        return Ok(());
    }

    Err((
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "Code": 401,
            "Message": "Authorization has been denied for this request."
        })),
    )
        .into_response())
}

/// Page `items` and wrap them in the list envelope.
pub(crate) fn list_page<T: Clone + Serialize>(
    state: &mut MockState,
    items: &[T],
    index: Option<usize>,
) -> Response {
    state.page_requests += 1;
    let (pages, data) = state.page_of(items, index.unwrap_or(0));
    (StatusCode::OK, Json(ListResponse { pages, data })).into_response()
}
