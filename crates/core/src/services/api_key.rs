//! API key service.
//!
//! Secrets are shown once at issue time. Only their SHA-256 digest is stored.

use quescheetah_common::{AppError, AppResult, IdGenerator, SharedClock};
use quescheetah_db::{entities::api_key, repositories::ApiKeyRepository};
use sea_orm::Set;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use validator::Validate;

/// Input for issuing an API key.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IssueApiKeyInput {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: String,
}

/// A newly issued key and its plaintext secret.
#[derive(Debug, Clone)]
pub struct IssuedApiKey {
    /// The stored key row, holding only the secret's digest.
    pub api_key: api_key::Model,
    /// Plaintext secret. It is not stored and cannot be recovered later.
    pub secret: String,
}

/// Hex-encoded SHA-256 digest of a secret.
#[must_use]
pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// API key service for business logic.
#[derive(Clone)]
pub struct ApiKeyService {
    api_key_repo: ApiKeyRepository,
    clock: SharedClock,
    id_gen: IdGenerator,
}

impl ApiKeyService {
    /// Create a new API key service.
    #[must_use]
    pub const fn new(api_key_repo: ApiKeyRepository, clock: SharedClock) -> Self {
        Self {
            api_key_repo,
            clock,
            id_gen: IdGenerator::new(),
        }
    }

    /// Issue a new key.
    pub async fn issue(&self, input: &IssueApiKeyInput) -> AppResult<IssuedApiKey> {
        input.validate()?;

        let secret = self.id_gen.generate_api_secret();
        let now = self.clock.now();
        let model = api_key::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            key_hash: Set(hash_secret(&secret)),
            created_dt: Set(now.into()),
            updated_dt: Set(now.into()),
        };

        let api_key = self.api_key_repo.create(model).await?;
        tracing::info!(api_key_id = %api_key.id, "Issued API key");

        Ok(IssuedApiKey { api_key, secret })
    }

    /// Resolve a secret to its key.
    pub async fn authenticate(&self, secret: &str) -> AppResult<api_key::Model> {
        if secret.is_empty() {
            return Err(AppError::Unauthorized);
        }
        self.api_key_repo
            .find_by_key_hash(&hash_secret(secret))
            .await?
            .ok_or(AppError::Unauthorized)
    }
}
