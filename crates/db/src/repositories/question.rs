//! Question repository.

use std::sync::Arc;

use crate::entities::{question, Question};
use crate::map_write_err;
use quescheetah_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

/// Question repository for database operations.
#[derive(Clone)]
pub struct QuestionRepository {
    db: Arc<DatabaseConnection>,
}

impl QuestionRepository {
    /// Create a new question repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a question by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<question::Model>> {
        Question::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether `api_key_id` already owns a question titled `title`.
    ///
    /// `exclude_id` leaves one record out of the check, so a question can be
    /// re-saved under its own title.
    pub async fn title_taken(
        &self,
        api_key_id: &str,
        title: &str,
        exclude_id: Option<&str>,
    ) -> AppResult<bool> {
        let mut query = Question::find()
            .filter(question::Column::ApiKeyId.eq(api_key_id))
            .filter(question::Column::QuestionTitle.eq(title));

        if let Some(id) = exclude_id {
            query = query.filter(question::Column::Id.ne(id));
        }

        let count = query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Get the member questions of a group, oldest first.
    pub async fn find_by_multi_question(
        &self,
        multi_question_id: &str,
    ) -> AppResult<Vec<question::Model>> {
        Question::find()
            .filter(question::Column::MultiQuestionId.eq(multi_question_id))
            .order_by_asc(question::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the member questions of a group.
    pub async fn find_ids_by_multi_question(
        &self,
        multi_question_id: &str,
    ) -> AppResult<Vec<String>> {
        Question::find()
            .select_only()
            .column(question::Column::Id)
            .filter(question::Column::MultiQuestionId.eq(multi_question_id))
            .order_by_asc(question::Column::Id)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new question.
    ///
    /// A duplicate `(api_key_id, question_title)` comes back as
    /// [`AppError::Conflict`].
    pub async fn create(&self, model: question::ActiveModel) -> AppResult<question::Model> {
        Self::create_in(self.db.as_ref(), model).await
    }

    /// Create a new question on `conn`, usually a transaction from [`Self::begin`].
    pub async fn create_in<C: ConnectionTrait>(
        conn: &C,
        model: question::ActiveModel,
    ) -> AppResult<question::Model> {
        model.insert(conn).await.map_err(map_write_err)
    }

    /// Open a transaction on this repository's connection.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a question.
    pub async fn update(&self, model: question::ActiveModel) -> AppResult<question::Model> {
        model.update(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Delete a question. Urls, answers and responses go with it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Question::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete every listed question owned by `api_key_id`.
    ///
    /// IDs owned by someone else are skipped. Returns the number of rows removed.
    pub async fn delete_many_for_owner(&self, api_key_id: &str, ids: &[String]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = Question::delete_many()
            .filter(question::Column::ApiKeyId.eq(api_key_id))
            .filter(question::Column::Id.is_in(ids.to_vec()))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::question::QuestionType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn create_test_question(id: &str, api_key_id: &str, title: &str) -> question::Model {
        let now = Utc::now();
        question::Model {
            id: id.to_string(),
            api_key_id: api_key_id.to_string(),
            question_type: QuestionType::Vote,
            multi_question_id: None,
            question_title: title.to_string(),
            question_text: "What should we eat?".to_string(),
            is_closed: false,
            start_dt: now.into(),
            end_dt: (now + chrono::Duration::days(30)).into(),
            is_editable: true,
            is_private: false,
            created_dt: now.into(),
            updated_dt: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let question = create_test_question("q1", "k1", "Lunch");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[question.clone()]])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        let found = repo.find_by_id("q1").await.unwrap().unwrap();

        assert_eq!(found.question_title, "Lunch");
        assert_eq!(found.api_key_id, "k1");
    }

    #[tokio::test]
    async fn test_title_taken_true() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        assert!(repo.title_taken("k1", "Lunch", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_title_taken_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        assert!(!repo.title_taken("k1", "Lunch", Some("q1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_multi_question() {
        let mut q1 = create_test_question("q1", "k1", "First");
        q1.multi_question_id = Some("g1".to_string());
        let mut q2 = create_test_question("q2", "k1", "Second");
        q2.multi_question_id = Some("g1".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[q1, q2]])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        let members = repo.find_by_multi_question("g1").await.unwrap();

        assert_eq!(members.len(), 2);
    }

    #[tokio::test]
    async fn test_create_duplicate_title_is_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom(
                    "duplicate key value violates unique constraint \"idx_question_api_key_title\""
                        .to_string(),
                )])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        let model = create_test_question("q2", "k1", "Lunch");
        let result = repo.create(model.into()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_many_for_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        let ids = vec!["q1".to_string(), "q2".to_string()];
        assert_eq!(repo.delete_many_for_owner("k1", &ids).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_many_for_owner_empty_is_noop() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = QuestionRepository::new(db);
        assert_eq!(repo.delete_many_for_owner("k1", &[]).await.unwrap(), 0);
    }
}
