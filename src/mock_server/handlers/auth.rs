//! Token endpoint handler.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

/// Form fields of the password grant.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub grant_type: String,
    pub username: String,
    pub password: String,
}

/// POST /oauth/token
pub async fn issue_token(
    State(state): State<Arc<RwLock<MockState>>>,
    Form(form): Form<TokenForm>,
) -> Response {
    if form.grant_type != "password" {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "unsupported_grant_type"})),
        )
            .into_response();
    }

    let mut state = state.write().await;

    match state.issue_token(&form.username, &form.password) {
        Some(token) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "access_token": token,
                "token_type": "Bearer",
                "expires_in": state.expires_in
            })),
        )
            .into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "The user name or password is incorrect."
            })),
        )
            .into_response(),
    }
}
