//! Answer endpoints.

use axum::{Json, Router, extract::State, routing::post};
use quescheetah_common::AppResult;
use quescheetah_core::{CreateAnswerInput, record::records};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    extractors::{AuthApiKey, MaybeApiKey},
    middleware::AppState,
    response::ApiResponse,
};

/// Add answer options request.
#[derive(Debug, Deserialize)]
pub struct CreateAnswersRequest {
    pub question_id: String,
    pub answers: Vec<CreateAnswerInput>,
}

/// List answers request.
#[derive(Debug, Deserialize)]
pub struct GetAnswersRequest {
    pub question_id: String,
}

/// Delete answer request.
#[derive(Debug, Deserialize)]
pub struct DeleteAnswerRequest {
    pub answer_id: String,
}

async fn create(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<CreateAnswersRequest>,
) -> AppResult<ApiResponse<Value>> {
    let answers = state
        .answer_service
        .create(&api_key.id, &req.question_id, &req.answers)
        .await?;

    Ok(ApiResponse::ok(records(&answers)))
}

/// Answers of a visible question, each with its `answer_count`.
async fn get(
    caller: MaybeApiKey,
    State(state): State<AppState>,
    Json(req): Json<GetAnswersRequest>,
) -> AppResult<ApiResponse<Value>> {
    let question = state
        .question_service
        .get_visible(caller.id(), &req.question_id)
        .await?;
    let answers = state.answer_service.list_with_counts(&question.id).await?;

    Ok(ApiResponse::ok(records(&answers)))
}

async fn delete(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<DeleteAnswerRequest>,
) -> AppResult<ApiResponse<Value>> {
    state
        .answer_service
        .delete(&api_key.id, &req.answer_id)
        .await?;

    Ok(ApiResponse::ok(json!({ "deleted": 1 })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/answer/create", post(create))
        .route("/answer/get", post(get))
        .route("/answer/delete", post(delete))
}
