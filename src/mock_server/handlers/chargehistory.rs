//! Charge history endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{authorize, list_page};
use crate::mock_server::state::MockState;
use crate::models::parse_timestamp;

/// Query parameters for the charge history.
#[derive(Debug, Default, Deserialize)]
pub struct ChargeHistoryParams {
    #[serde(rename = "installationId")]
    pub installation_id: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "To")]
    pub to: Option<String>,
    #[serde(rename = "pageIndex")]
    pub page_index: Option<usize>,
}

/// GET /api/chargehistory
pub async fn list_charge_history(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(params): Query<ChargeHistoryParams>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&mut state, &headers) {
        return denied;
    }

    let from = params.from.as_deref().and_then(parse_timestamp);
    let to = params.to.as_deref().and_then(parse_timestamp);

    let sessions: Vec<_> = state
        .sessions
        .iter()
        .filter(|s| from.map_or(true, |from| s.start_date_time >= from))
        .filter(|s| to.map_or(true, |to| s.start_date_time <= to))
        .cloned()
        .collect();

    list_page(&mut state, &sessions, params.page_index)
}

/// POST /api/chargehistory/installationreport
pub async fn installation_report(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&mut state, &headers) {
        return denied;
    }

    state.last_report_request = Some(body);

    match &state.report {
        Some(report) => (StatusCode::OK, Json(report.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"Message": "No report for installation"})),
        )
            .into_response(),
    }
}
