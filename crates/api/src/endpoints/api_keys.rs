//! API key endpoints.

use axum::{Json, Router, extract::State, routing::post};
use quescheetah_common::AppResult;
use quescheetah_core::{IssueApiKeyInput, ToRecord};
use serde_json::{Value, json};

use crate::{extractors::AdminToken, middleware::AppState, response::ApiResponse};

/// Issue a new key. The secret is only ever returned here.
async fn issue(
    _admin: AdminToken,
    State(state): State<AppState>,
    Json(req): Json<IssueApiKeyInput>,
) -> AppResult<ApiResponse<Value>> {
    let issued = state.api_key_service.issue(&req).await?;

    Ok(ApiResponse::ok(json!({
        "api_key": issued.api_key.to_record(),
        "secret": issued.secret,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/issue", post(issue))
}
