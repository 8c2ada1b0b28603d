//! Token endpoint handler.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use super::resources::error_response;
use crate::mock_server::state::MockState;

/// Credentials posted to the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub identification: String,
    pub password: String,
}

/// POST /api/token
pub async fn create_token(
    State(state): State<Arc<RwLock<MockState>>>,
    Json(request): Json<TokenRequest>,
) -> Response {
    let mut state = state.write().await;

    match state.issue_token(&request.identification, &request.password) {
        Some((token, user_id)) => {
            // Flarum sends the user id as a number
            let user_id = user_id
                .parse::<u64>()
                .map_or_else(|_| Value::from(user_id.clone()), Value::from);
            (StatusCode::OK, Json(json!({ "token": token, "userId": user_id }))).into_response()
        }
        None => error_response(StatusCode::UNAUTHORIZED, "not_authenticated"),
    }
}
