//! URL repository.

use std::sync::Arc;

use crate::entities::{url, Url};
use crate::map_write_err;
use quescheetah_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// URL repository for database operations.
#[derive(Clone)]
pub struct UrlRepository {
    db: Arc<DatabaseConnection>,
}

impl UrlRepository {
    /// Create a new URL repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get the URLs of a question, oldest first.
    pub async fn find_by_question(&self, question_id: &str) -> AppResult<Vec<url::Model>> {
        Url::find()
            .filter(url::Column::QuestionId.eq(question_id))
            .order_by_asc(url::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new URL.
    pub async fn create(&self, model: url::ActiveModel) -> AppResult<url::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_write_err)
    }
}
