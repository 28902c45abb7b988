//! Charger and installation endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{authorize, list_page};
use crate::mock_server::state::MockState;

/// Paging parameter shared by plain list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(rename = "pageIndex")]
    pub page_index: Option<usize>,
}

/// GET /api/chargers
pub async fn list_chargers(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&mut state, &headers) {
        return denied;
    }

    let chargers = state.chargers.clone();
    list_page(&mut state, &chargers, params.page_index)
}

/// GET /api/installation
pub async fn list_installations(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&mut state, &headers) {
        return denied;
    }

    let installations = state.installations.clone();
    list_page(&mut state, &installations, params.page_index)
}
