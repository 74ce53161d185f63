//! Respondent answer endpoints.

use axum::{Json, Router, extract::State, routing::post};
use quescheetah_common::AppResult;
use quescheetah_core::{Record, ToRecord, UserAnswerInput};
use serde_json::{Value, json};

use crate::{extractors::AuthApiKey, middleware::AppState, response::ApiResponse};

async fn create(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<UserAnswerInput>,
) -> AppResult<ApiResponse<Record>> {
    let response = state
        .user_answer_service
        .record(&api_key.id, &req)
        .await?;

    Ok(ApiResponse::ok(response.to_record()))
}

async fn delete(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<UserAnswerInput>,
) -> AppResult<ApiResponse<Value>> {
    state.user_answer_service.delete(&api_key.id, &req).await?;
    Ok(ApiResponse::ok(json!({ "deleted": 1 })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/useranswer/create", post(create))
        .route("/useranswer/delete", post(delete))
}
