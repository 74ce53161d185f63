//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use quescheetah_common::AppError;
use quescheetah_core::hash_secret;
use quescheetah_db::entities::api_key;

use crate::middleware::AppState;

/// Header carrying the admin token.
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Authenticated API key extractor.
#[derive(Debug, Clone)]
pub struct AuthApiKey(pub api_key::Model);

impl<S> FromRequestParts<S> for AuthApiKey
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by auth middleware
        parts
            .extensions
            .get::<api_key::Model>()
            .cloned()
            .map(AuthApiKey)
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional API key extractor for endpoints open to anonymous callers.
#[derive(Debug, Clone)]
pub struct MaybeApiKey(pub Option<api_key::Model>);

impl MaybeApiKey {
    /// ID of the caller's key, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.as_ref().map(|key| key.id.as_str())
    }
}

impl<S> FromRequestParts<S> for MaybeApiKey
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<api_key::Model>().cloned()))
    }
}

/// Compares sha-256 digests so the match time does not depend on a shared prefix.
fn token_matches(expected: &str, supplied: &str) -> bool {
    hash_secret(expected) == hash_secret(supplied)
}

/// Proof that the request carried the configured admin token.
#[derive(Debug, Clone, Copy)]
pub struct AdminToken;

impl FromRequestParts<AppState> for AdminToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_token.as_deref() else {
            return Err(AppError::Forbidden("API key issuing is disabled".to_string()));
        };

        let supplied = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());

        match supplied {
            Some(token) if token_matches(expected, token) => Ok(Self),
            _ => Err(AppError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_matches_same_token() {
        assert!(token_matches("admin-secret", "admin-secret"));
    }

    #[test]
    fn test_token_rejects_other_tokens() {
        assert!(!token_matches("admin-secret", "admin-secreT"));
        assert!(!token_matches("admin-secret", "admin"));
        assert!(!token_matches("admin-secret", "admin-secret-and-more"));
        assert!(!token_matches("admin-secret", ""));
    }
}
