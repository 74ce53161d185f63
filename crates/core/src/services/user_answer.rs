//! Vote recording.

use chrono::{DateTime, Utc};
use quescheetah_common::{AppError, AppResult, IdGenerator, SharedClock};
use quescheetah_db::{
    entities::{question, user_answer},
    repositories::{AnswerRepository, QuestionRepository, UserAnswerRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::question::ensure_owner;

const ALREADY_ANSWERED: &str = "user already answered this question";

/// Input for recording or removing a response.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserAnswerInput {
    pub answer_id: String,
    #[validate(length(min = 1, max = 100, message = "user must be 1 to 100 characters"))]
    pub unique_user: String,
}

/// Check that `question` accepts responses at `now`.
pub fn ensure_open(question: &question::Model, now: DateTime<Utc>) -> AppResult<()> {
    if question.is_closed {
        return Err(AppError::field("is_closed", "question is closed"));
    }
    if now < question.start_dt.with_timezone(&Utc) {
        return Err(AppError::field("start_dt", "question has not started yet"));
    }
    if now >= question.end_dt.with_timezone(&Utc) {
        return Err(AppError::field("end_dt", "question has already ended"));
    }
    Ok(())
}

fn already_answered(err: AppError) -> AppError {
    match err {
        AppError::Conflict(_) => AppError::field("unique_user", ALREADY_ANSWERED),
        other => other,
    }
}

/// User answer service for business logic.
#[derive(Clone)]
pub struct UserAnswerService {
    user_answer_repo: UserAnswerRepository,
    answer_repo: AnswerRepository,
    question_repo: QuestionRepository,
    clock: SharedClock,
    id_gen: IdGenerator,
}

impl UserAnswerService {
    /// Create a new user answer service.
    #[must_use]
    pub const fn new(
        user_answer_repo: UserAnswerRepository,
        answer_repo: AnswerRepository,
        question_repo: QuestionRepository,
        clock: SharedClock,
    ) -> Self {
        Self {
            user_answer_repo,
            answer_repo,
            question_repo,
            clock,
            id_gen: IdGenerator::new(),
        }
    }

    async fn owned_question_of_answer(
        &self,
        owner: &str,
        answer_id: &str,
    ) -> AppResult<question::Model> {
        let answer = self
            .answer_repo
            .find_by_id(answer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Answer {answer_id} not found")))?;
        let question = self
            .question_repo
            .find_by_id(&answer.question_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question {} not found", answer.question_id)))?;
        ensure_owner(&question, owner)?;
        Ok(question)
    }

    /// Record that `unique_user` picked an answer.
    ///
    /// A respondent answers each question once. On an editable question a
    /// repeat moves the existing response to the new answer.
    pub async fn record(
        &self,
        owner: &str,
        input: &UserAnswerInput,
    ) -> AppResult<user_answer::Model> {
        input.validate()?;
        let question = self.owned_question_of_answer(owner, &input.answer_id).await?;
        let now = self.clock.now();
        ensure_open(&question, now)?;

        let existing = self
            .user_answer_repo
            .find_by_question_and_user(&question.id, &input.unique_user)
            .await?;

        match existing {
            Some(_) if !question.is_editable => {
                tracing::debug!(question_id = %question.id, "Repeat response on locked question");
                Err(AppError::field("unique_user", ALREADY_ANSWERED))
            }
            Some(previous) if previous.answer_id == input.answer_id => Ok(previous),
            Some(previous) => {
                let previous_answer = previous.answer_id.clone();
                let mut active: user_answer::ActiveModel = previous.into();
                active.answer_id = Set(input.answer_id.clone());
                active.updated_dt = Set(now.into());
                let moved = self.user_answer_repo.update(active).await?;

                tracing::info!(
                    question_id = %question.id,
                    from = %previous_answer,
                    to = %moved.answer_id,
                    "Moved response"
                );
                Ok(moved)
            }
            None => {
                let model = user_answer::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    answer_id: Set(input.answer_id.clone()),
                    question_id: Set(question.id.clone()),
                    unique_user: Set(input.unique_user.clone()),
                    created_dt: Set(now.into()),
                    updated_dt: Set(now.into()),
                };
                let created = self
                    .user_answer_repo
                    .create(model)
                    .await
                    .map_err(already_answered)?;

                tracing::info!(question_id = %question.id, answer_id = %created.answer_id, "Recorded response");
                Ok(created)
            }
        }
    }

    /// Remove the response of `unique_user` from an answer.
    pub async fn delete(&self, owner: &str, input: &UserAnswerInput) -> AppResult<()> {
        self.owned_question_of_answer(owner, &input.answer_id).await?;

        let response = self
            .user_answer_repo
            .find_by_answer_and_user(&input.answer_id, &input.unique_user)
            .await?
            .ok_or_else(|| AppError::NotFound("Response not found".to_string()))?;

        self.user_answer_repo.delete(&response.id).await?;
        tracing::info!(answer_id = %input.answer_id, "Deleted response");
        Ok(())
    }
}
