//! Question endpoints.

use axum::{Json, Router, extract::State, routing::post};
use quescheetah_common::AppResult;
use quescheetah_core::{
    CreateQuestionInput, CreateQuestionWithAnswersInput, CreateUrlInput, Record, ToRecord,
    UpdateQuestionInput, record::records,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    extractors::{AuthApiKey, MaybeApiKey},
    middleware::AppState,
    response::ApiResponse,
};

// ==================== Request Types ====================

/// Request naming one question.
#[derive(Debug, Deserialize)]
pub struct QuestionIdRequest {
    pub question_id: String,
}

/// Update question request.
#[derive(Debug, Deserialize)]
pub struct UpdateQuestionRequest {
    pub question_id: String,
    #[serde(flatten)]
    pub changes: UpdateQuestionInput,
}

/// Delete several questions at once.
#[derive(Debug, Deserialize)]
pub struct DeleteQuestionSetRequest {
    pub question_ids: Vec<String>,
}

/// Attach an access URL request.
#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub question_id: String,
    #[serde(flatten)]
    pub url: CreateUrlInput,
}

// ==================== Handlers ====================

/// Create a question together with its answers.
async fn create_single(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<CreateQuestionWithAnswersInput>,
) -> AppResult<ApiResponse<Record>> {
    let detail = state
        .question_service
        .create_with_answers(&api_key.id, &req)
        .await?;

    Ok(ApiResponse::ok(detail.to_record()))
}

/// Create a bare question.
async fn create(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<CreateQuestionInput>,
) -> AppResult<ApiResponse<Record>> {
    let question = state.question_service.create(&api_key.id, &req).await?;
    Ok(ApiResponse::ok(question.to_record()))
}

/// Show a question with answers, counts and URLs. Public questions need no key.
async fn get(
    caller: MaybeApiKey,
    State(state): State<AppState>,
    Json(req): Json<QuestionIdRequest>,
) -> AppResult<ApiResponse<Record>> {
    let detail = state
        .question_service
        .get_detail(caller.id(), &req.question_id)
        .await?;

    Ok(ApiResponse::ok(detail.to_record()))
}

async fn update(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<UpdateQuestionRequest>,
) -> AppResult<ApiResponse<Record>> {
    let question = state
        .question_service
        .update(&api_key.id, &req.question_id, &req.changes)
        .await?;

    Ok(ApiResponse::ok(question.to_record()))
}

async fn delete(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<QuestionIdRequest>,
) -> AppResult<ApiResponse<Value>> {
    state
        .question_service
        .delete(&api_key.id, &req.question_id)
        .await?;

    Ok(ApiResponse::ok(json!({ "deleted": 1 })))
}

async fn delete_set(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<DeleteQuestionSetRequest>,
) -> AppResult<ApiResponse<Value>> {
    let deleted = state
        .question_service
        .delete_set(&api_key.id, &req.question_ids)
        .await?;

    Ok(ApiResponse::ok(json!({ "deleted": deleted })))
}

async fn create_url(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<CreateUrlRequest>,
) -> AppResult<ApiResponse<Record>> {
    let url = state
        .question_service
        .add_url(&api_key.id, &req.question_id, &req.url)
        .await?;

    Ok(ApiResponse::ok(url.to_record()))
}

async fn list_urls(
    AuthApiKey(api_key): AuthApiKey,
    State(state): State<AppState>,
    Json(req): Json<QuestionIdRequest>,
) -> AppResult<ApiResponse<Value>> {
    let urls = state
        .question_service
        .list_urls(&api_key.id, &req.question_id)
        .await?;

    Ok(ApiResponse::ok(records(&urls)))
}

// ==================== Router ====================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/single/create", post(create_single))
        .route("/question/create", post(create))
        .route("/question/get", post(get))
        .route("/question/update", post(update))
        .route("/question/delete", post(delete))
        .route("/question/set/delete", post(delete_set))
        .route("/question/url/create", post(create_url))
        .route("/question/url/get", post(list_urls))
}
