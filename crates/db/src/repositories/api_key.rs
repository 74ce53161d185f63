//! API key repository.

use std::sync::Arc;

use crate::entities::{api_key, ApiKey};
use crate::map_write_err;
use quescheetah_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// API key repository for database operations.
#[derive(Clone)]
pub struct ApiKeyRepository {
    db: Arc<DatabaseConnection>,
}

impl ApiKeyRepository {
    /// Create a new API key repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an API key by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<api_key::Model>> {
        ApiKey::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an API key by the digest of its secret.
    pub async fn find_by_key_hash(&self, key_hash: &str) -> AppResult<Option<api_key::Model>> {
        ApiKey::find()
            .filter(api_key::Column::KeyHash.eq(key_hash))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new API key.
    pub async fn create(&self, model: api_key::ActiveModel) -> AppResult<api_key::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_api_key(id: &str, key_hash: &str) -> api_key::Model {
        api_key::Model {
            id: id.to_string(),
            name: "owner".to_string(),
            key_hash: key_hash.to_string(),
            created_dt: Utc::now().into(),
            updated_dt: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_key_hash_found() {
        let key = create_test_api_key("k1", "abc");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[key.clone()]])
                .into_connection(),
        );

        let repo = ApiKeyRepository::new(db);
        let result = repo.find_by_key_hash("abc").await.unwrap();

        assert_eq!(result.map(|k| k.id), Some("k1".to_string()));
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<api_key::Model>::new()])
                .into_connection(),
        );

        let repo = ApiKeyRepository::new(db);
        let result = repo.find_by_id("missing").await.unwrap();

        assert!(result.is_none());
    }
}
