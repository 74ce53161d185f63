//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use quescheetah_common::SharedClock;
use quescheetah_core::{
    AnswerService, ApiKeyService, MultiQuestionService, QuestionService, UserAnswerService,
};
use quescheetah_db::repositories::{
    AnswerRepository, ApiKeyRepository, MultiQuestionRepository, QuestionRepository,
    UrlRepository, UserAnswerRepository,
};
use sea_orm::DatabaseConnection;

/// Header carrying an API key secret.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub question_service: QuestionService,
    pub answer_service: AnswerService,
    pub user_answer_service: UserAnswerService,
    pub multi_question_service: MultiQuestionService,
    pub api_key_service: ApiKeyService,
    /// Token required by `/api-keys/issue`; issuing is disabled when unset.
    pub admin_token: Option<String>,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        clock: SharedClock,
        default_duration_days: i64,
        admin_token: Option<String>,
    ) -> Self {
        let api_key_repo = ApiKeyRepository::new(Arc::clone(&db));
        let multi_question_repo = MultiQuestionRepository::new(Arc::clone(&db));
        let question_repo = QuestionRepository::new(Arc::clone(&db));
        let url_repo = UrlRepository::new(Arc::clone(&db));
        let answer_repo = AnswerRepository::new(Arc::clone(&db));
        let user_answer_repo = UserAnswerRepository::new(db);

        let question_service = QuestionService::new(
            question_repo.clone(),
            url_repo,
            answer_repo.clone(),
            user_answer_repo.clone(),
            clock.clone(),
            default_duration_days,
        );
        let answer_service = AnswerService::new(
            answer_repo.clone(),
            question_repo.clone(),
            user_answer_repo.clone(),
            clock.clone(),
        );
        let user_answer_service = UserAnswerService::new(
            user_answer_repo,
            answer_repo,
            question_repo.clone(),
            clock.clone(),
        );
        let multi_question_service = MultiQuestionService::new(
            multi_question_repo,
            question_repo,
            question_service.clone(),
            clock.clone(),
        );
        let api_key_service = ApiKeyService::new(api_key_repo, clock);

        Self {
            question_service,
            answer_service,
            user_answer_service,
            multi_question_service,
            api_key_service,
            admin_token,
        }
    }
}

/// Pull the API key secret from `X-Api-Key` or `Authorization: Bearer`.
pub fn secret_from_headers(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get(API_KEY_HEADER)
        && let Ok(secret) = value.to_str()
    {
        return Some(secret.trim());
    }

    headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Authentication middleware.
///
/// A valid secret puts the owning key into the request extensions. Invalid
/// or missing secrets leave the request anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(secret) = secret_from_headers(req.headers()).map(ToString::to_string) {
        match state.api_key_service.authenticate(&secret).await {
            Ok(api_key) => {
                req.extensions_mut().insert(api_key);
            }
            Err(e) => tracing::debug!(error = %e, "API key rejected"),
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_secret_from_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("qc_abc"));
        assert_eq!(secret_from_headers(&headers), Some("qc_abc"));
    }

    #[test]
    fn test_secret_from_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer qc_abc"));
        assert_eq!(secret_from_headers(&headers), Some("qc_abc"));
    }

    #[test]
    fn test_no_secret() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Basic Zm9v"));
        assert_eq!(secret_from_headers(&headers), None);
    }
}
