//! Question group endpoints.

use axum::{Json, Router, extract::State, routing::post};
use quescheetah_common::AppResult;
use quescheetah_core::{CreateMultiQuestionInput, Record, ToRecord};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{extractors::AuthApiKey, middleware::AppState, response::ApiResponse};

/// Request naming one group.
#[derive(Debug, Deserialize)]
pub struct MultiQuestionIdRequest {
    pub multi_question_id: String,
}

/// Create a group and all of its questions. A blank name creates the questions ungrouped.
async fn create(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<CreateMultiQuestionInput>,
) -> AppResult<ApiResponse<Record>> {
    let created = state
        .multi_question_service
        .create(&api_key.id, &req)
        .await?;

    Ok(ApiResponse::ok(created.to_record()))
}

async fn get(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<MultiQuestionIdRequest>,
) -> AppResult<ApiResponse<Record>> {
    let group = state
        .multi_question_service
        .get(&api_key.id, &req.multi_question_id)
        .await?;

    Ok(ApiResponse::ok(group.to_record()))
}

/// Delete a group with its member questions.
async fn delete(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<MultiQuestionIdRequest>,
) -> AppResult<ApiResponse<Value>> {
    let deleted_questions = state
        .multi_question_service
        .delete(&api_key.id, &req.multi_question_id)
        .await?;

    Ok(ApiResponse::ok(
        json!({ "deleted": 1, "deleted_questions": deleted_questions }),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/multiple/create", post(create))
        .route("/multiple/get", post(get))
        .route("/multiple/delete", post(delete))
}
