//! Answer service.

use chrono::{DateTime, Utc};
use quescheetah_common::{AppError, AppResult, IdGenerator, SharedClock};
use quescheetah_db::{
    entities::answer,
    repositories::{AnswerRepository, QuestionRepository, UserAnswerRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::question::ensure_owner;
use crate::record::AnswerWithCount;

/// Input for creating an answer option.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAnswerInput {
    #[validate(length(min = 1, max = 50, message = "answer must be 1 to 50 characters"))]
    pub answer_text: String,
    #[serde(default)]
    pub answer_num: Option<i32>,
}

pub(crate) fn build_answer(
    id: String,
    question_id: &str,
    input: &CreateAnswerInput,
    now: DateTime<Utc>,
) -> answer::ActiveModel {
    answer::ActiveModel {
        id: Set(id),
        question_id: Set(question_id.to_string()),
        answer_text: Set(input.answer_text.clone()),
        answer_num: Set(input.answer_num),
        created_dt: Set(now.into()),
        updated_dt: Set(now.into()),
    }
}

/// Answer service for business logic.
#[derive(Clone)]
pub struct AnswerService {
    answer_repo: AnswerRepository,
    question_repo: QuestionRepository,
    user_answer_repo: UserAnswerRepository,
    clock: SharedClock,
    id_gen: IdGenerator,
}

impl AnswerService {
    /// Create a new answer service.
    #[must_use]
    pub const fn new(
        answer_repo: AnswerRepository,
        question_repo: QuestionRepository,
        user_answer_repo: UserAnswerRepository,
        clock: SharedClock,
    ) -> Self {
        Self {
            answer_repo,
            question_repo,
            user_answer_repo,
            clock,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get an answer by ID.
    pub async fn get(&self, id: &str) -> AppResult<answer::Model> {
        self.answer_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Answer {id} not found")))
    }

    /// Number of responses currently recorded for an answer.
    ///
    /// Always counted from storage.
    pub async fn get_answer_count(&self, answer_id: &str) -> AppResult<u64> {
        self.user_answer_repo.count_by_answer(answer_id).await
    }

    /// Add answer options to a question owned by `owner`.
    ///
    /// Every input is validated before the first one is written, and all of
    /// them are committed together.
    pub async fn create(
        &self,
        owner: &str,
        question_id: &str,
        inputs: &[CreateAnswerInput],
    ) -> AppResult<Vec<answer::Model>> {
        let question = self
            .question_repo
            .find_by_id(question_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question {question_id} not found")))?;
        ensure_owner(&question, owner)?;

        if inputs.is_empty() {
            return Err(AppError::field("answers", "at least one answer is required"));
        }
        for input in inputs {
            input.validate()?;
        }

        let txn = self.answer_repo.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let model = build_answer(self.id_gen.generate(), &question.id, input, self.clock.now());
            created.push(AnswerRepository::create_in(&txn, model).await?);
        }
        quescheetah_db::commit(txn).await?;

        tracing::info!(question_id = %question.id, count = created.len(), "Created answers");
        Ok(created)
    }

    /// List the answers of a question with their response counts.
    pub async fn list_with_counts(&self, question_id: &str) -> AppResult<Vec<AnswerWithCount>> {
        let answers = self.answer_repo.find_by_question(question_id).await?;

        let mut counted = Vec::with_capacity(answers.len());
        for answer in answers {
            let answer_count = self.get_answer_count(&answer.id).await?;
            counted.push(AnswerWithCount {
                answer,
                answer_count,
            });
        }
        Ok(counted)
    }

    /// Delete an answer of a question owned by `owner`, with its responses.
    pub async fn delete(&self, owner: &str, answer_id: &str) -> AppResult<()> {
        let answer = self.get(answer_id).await?;
        let question = self
            .question_repo
            .find_by_id(&answer.question_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question {} not found", answer.question_id)))?;
        ensure_owner(&question, owner)?;

        self.answer_repo.delete(&answer.id).await?;
        tracing::info!(answer_id = %answer.id, "Deleted answer");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use quescheetah_common::FixedClock;
    use quescheetah_db::entities::question::{self, QuestionType};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 8, 0, 0).unwrap()
    }

    fn test_answer(id: &str) -> answer::Model {
        answer::Model {
            id: id.to_string(),
            question_id: "q1".to_string(),
            answer_text: format!("option {id}"),
            answer_num: None,
            created_dt: now().into(),
            updated_dt: now().into(),
        }
    }

    fn test_question(owner: &str) -> question::Model {
        question::Model {
            id: "q1".to_string(),
            api_key_id: owner.to_string(),
            question_type: QuestionType::Vote,
            multi_question_id: None,
            question_title: "Lunch".to_string(),
            question_text: String::new(),
            is_closed: false,
            start_dt: now().into(),
            end_dt: now().into(),
            is_editable: true,
            is_private: false,
            created_dt: now().into(),
            updated_dt: now().into(),
        }
    }

    fn service(answer_db: MockDatabase, question_db: MockDatabase, ua_db: MockDatabase) -> AnswerService {
        AnswerService::new(
            AnswerRepository::new(Arc::new(answer_db.into_connection())),
            QuestionRepository::new(Arc::new(question_db.into_connection())),
            UserAnswerRepository::new(Arc::new(ua_db.into_connection())),
            Arc::new(FixedClock::new(now())),
        )
    }

    fn count_rows(count: i64) -> [std::collections::BTreeMap<&'static str, sea_orm::Value>; 1] {
        [maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(count)) }]
    }

    #[tokio::test]
    async fn test_answer_count_zero_then_three() {
        let ua_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_rows(0)])
            .append_query_results([count_rows(3)]);
        let pg = || MockDatabase::new(DatabaseBackend::Postgres);
        let service = service(pg(), pg(), ua_db);

        assert_eq!(service.get_answer_count("a1").await.unwrap(), 0);
        assert_eq!(service.get_answer_count("a1").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_list_with_counts() {
        let answer_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_answer("a1"), test_answer("a2")]]);
        let ua_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_rows(2)])
            .append_query_results([count_rows(5)]);
        let service = service(answer_db, MockDatabase::new(DatabaseBackend::Postgres), ua_db);

        let listed = service.list_with_counts("q1").await.unwrap();
        let counts: Vec<u64> = listed.iter().map(|a| a.answer_count).collect();
        assert_eq!(counts, vec![2, 5]);
    }

    #[tokio::test]
    async fn test_create_on_foreign_question_is_forbidden() {
        let question_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_question("k1")]]);
        let pg = || MockDatabase::new(DatabaseBackend::Postgres);
        let service = service(pg(), question_db, pg());

        let inputs = vec![CreateAnswerInput {
            answer_text: "Pizza".to_string(),
            answer_num: Some(1),
        }];
        let result = service.create("k2", "q1", &inputs).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_answer_text() {
        let question_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_question("k1")]]);
        let pg = || MockDatabase::new(DatabaseBackend::Postgres);
        let service = service(pg(), question_db, pg());

        let inputs = vec![CreateAnswerInput {
            answer_text: String::new(),
            answer_num: None,
        }];
        match service.create("k1", "q1", &inputs).await {
            Err(AppError::Field { field, .. }) => assert_eq!(field, "answer_text"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_writes_every_answer() {
        let answer_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_answer("a1")]])
            .append_query_results([[test_answer("a2")]]);
        let question_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_question("k1")]]);
        let service = service(answer_db, question_db, MockDatabase::new(DatabaseBackend::Postgres));

        let inputs = vec![
            CreateAnswerInput {
                answer_text: "Pizza".to_string(),
                answer_num: Some(1),
            },
            CreateAnswerInput {
                answer_text: "Sushi".to_string(),
                answer_num: Some(2),
            },
        ];
        let created = service.create("k1", "q1", &inputs).await.unwrap();
        assert_eq!(created.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_second_answer_rolls_back_first() {
        let answer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_answer("a1")]])
                .append_query_errors([DbErr::Custom("connection reset".to_string())])
                .into_connection(),
        );
        let question_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_question("k1")]]);
        let service = AnswerService::new(
            AnswerRepository::new(Arc::clone(&answer_db)),
            QuestionRepository::new(Arc::new(question_db.into_connection())),
            UserAnswerRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
            Arc::new(FixedClock::new(now())),
        );

        let inputs = vec![
            CreateAnswerInput {
                answer_text: "Pizza".to_string(),
                answer_num: Some(1),
            },
            CreateAnswerInput {
                answer_text: "Sushi".to_string(),
                answer_num: Some(2),
            },
        ];
        assert!(service.create("k1", "q1", &inputs).await.is_err());
        drop(service);

        let Ok(conn) = Arc::try_unwrap(answer_db) else {
            panic!("connection still shared");
        };
        let log = format!("{:?}", conn.into_transaction_log());
        assert!(log.contains("ROLLBACK"));
        assert!(!log.contains("COMMIT"));
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let answer_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_answer("a1")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]);
        let question_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_question("k1")]]);
        let service = service(answer_db, question_db, MockDatabase::new(DatabaseBackend::Postgres));

        assert!(service.delete("k1", "a1").await.is_ok());
    }
}
