//! Answer repository.

use std::sync::Arc;

use crate::entities::{answer, Answer};
use crate::map_write_err;
use quescheetah_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

/// Answer repository for database operations.
#[derive(Clone)]
pub struct AnswerRepository {
    db: Arc<DatabaseConnection>,
}

impl AnswerRepository {
    /// Create a new answer repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an answer by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<answer::Model>> {
        Answer::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the answers of a question, ordered by `answer_num` then creation.
    pub async fn find_by_question(&self, question_id: &str) -> AppResult<Vec<answer::Model>> {
        Answer::find()
            .filter(answer::Column::QuestionId.eq(question_id))
            .order_by_asc(answer::Column::AnswerNum)
            .order_by_asc(answer::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the answers of a question.
    pub async fn find_ids_by_question(&self, question_id: &str) -> AppResult<Vec<String>> {
        Answer::find()
            .select_only()
            .column(answer::Column::Id)
            .filter(answer::Column::QuestionId.eq(question_id))
            .order_by_asc(answer::Column::Id)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new answer.
    pub async fn create(&self, model: answer::ActiveModel) -> AppResult<answer::Model> {
        Self::create_in(self.db.as_ref(), model).await
    }

    /// Create a new answer on `conn`, usually a transaction from [`Self::begin`].
    pub async fn create_in<C: ConnectionTrait>(
        conn: &C,
        model: answer::ActiveModel,
    ) -> AppResult<answer::Model> {
        model.insert(conn).await.map_err(map_write_err)
    }

    /// Open a transaction on this repository's connection.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an answer. Its responses go with it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Answer::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
