//! Multi-question repository.

use std::sync::Arc;

use crate::entities::{multi_question, question, MultiQuestion, Question};
use crate::map_write_err;
use quescheetah_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, TransactionTrait,
};

/// Multi-question repository for database operations.
#[derive(Clone)]
pub struct MultiQuestionRepository {
    db: Arc<DatabaseConnection>,
}

impl MultiQuestionRepository {
    /// Create a new multi-question repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a group by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<multi_question::Model>> {
        MultiQuestion::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new group.
    pub async fn create(
        &self,
        model: multi_question::ActiveModel,
    ) -> AppResult<multi_question::Model> {
        Self::create_in(self.db.as_ref(), model).await
    }

    /// Create a new group on `conn`, usually a transaction from [`Self::begin`].
    pub async fn create_in<C: ConnectionTrait>(
        conn: &C,
        model: multi_question::ActiveModel,
    ) -> AppResult<multi_question::Model> {
        model.insert(conn).await.map_err(map_write_err)
    }

    /// Open a transaction on this repository's connection.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a group together with its member questions, in one transaction.
    ///
    /// Member rows are removed explicitly; the foreign key alone would only
    /// detach them.
    pub async fn delete_with_members(&self, id: &str) -> AppResult<u64> {
        let txn = self.begin().await?;

        let members = Question::delete_many()
            .filter(question::Column::MultiQuestionId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        MultiQuestion::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        crate::commit(txn).await?;
        Ok(members.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_find_by_id_found() {
        let group = multi_question::Model {
            id: "g1".to_string(),
            api_key_id: "k1".to_string(),
            group_name: "Weekly".to_string(),
            created_dt: Utc::now().into(),
            updated_dt: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[group]])
                .into_connection(),
        );

        let repo = MultiQuestionRepository::new(db);
        let found = repo.find_by_id("g1").await.unwrap().unwrap();

        assert_eq!(found.group_name, "Weekly");
    }

    #[tokio::test]
    async fn test_delete_with_members_reports_member_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 3, // member questions
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1, // group
                    },
                ])
                .into_connection(),
        );

        let repo = MultiQuestionRepository::new(db);
        let deleted = repo.delete_with_members("g1").await.unwrap();

        assert_eq!(deleted, 3);
    }

    #[tokio::test]
    async fn test_delete_with_members_rolls_back_on_group_failure() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 3,
                }])
                .append_exec_errors([DbErr::Custom("connection reset".to_string())])
                .into_connection(),
        );

        let repo = MultiQuestionRepository::new(Arc::clone(&db));
        assert!(repo.delete_with_members("g1").await.is_err());
        drop(repo);

        let Ok(conn) = Arc::try_unwrap(db) else {
            panic!("connection still shared");
        };
        let log = format!("{:?}", conn.into_transaction_log());
        assert!(log.contains("ROLLBACK"));
        assert!(!log.contains("COMMIT"));
    }
}
