//! User answer repository.

use std::sync::Arc;

use crate::entities::{user_answer, UserAnswer};
use crate::map_write_err;
use quescheetah_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

/// User answer repository for database operations.
#[derive(Clone)]
pub struct UserAnswerRepository {
    db: Arc<DatabaseConnection>,
}

impl UserAnswerRepository {
    /// Create a new user answer repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the response of `unique_user` to a question.
    pub async fn find_by_question_and_user(
        &self,
        question_id: &str,
        unique_user: &str,
    ) -> AppResult<Option<user_answer::Model>> {
        UserAnswer::find()
            .filter(user_answer::Column::QuestionId.eq(question_id))
            .filter(user_answer::Column::UniqueUser.eq(unique_user))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the response of `unique_user` recorded against one answer.
    pub async fn find_by_answer_and_user(
        &self,
        answer_id: &str,
        unique_user: &str,
    ) -> AppResult<Option<user_answer::Model>> {
        UserAnswer::find()
            .filter(user_answer::Column::AnswerId.eq(answer_id))
            .filter(user_answer::Column::UniqueUser.eq(unique_user))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count responses linked to an answer.
    pub async fn count_by_answer(&self, answer_id: &str) -> AppResult<u64> {
        UserAnswer::find()
            .filter(user_answer::Column::AnswerId.eq(answer_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new response.
    ///
    /// A second response for the same `(question_id, unique_user)` comes back
    /// as [`AppError::Conflict`].
    pub async fn create(&self, model: user_answer::ActiveModel) -> AppResult<user_answer::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Update a response.
    pub async fn update(&self, model: user_answer::ActiveModel) -> AppResult<user_answer::Model> {
        model.update(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Delete a response.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        UserAnswer::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
