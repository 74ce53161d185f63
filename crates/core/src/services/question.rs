//! Question service.
//!
//! Every write goes through [`QuestionService::validate_new`] (or the update
//! equivalent) before anything is persisted. Checks run in a fixed order and
//! the first failure is returned as a field-tagged [`AppError::Field`]:
//!
//! 1. title unique for the owner
//! 2. field lengths
//! 3. start not in the past, defaulting to now
//! 4. end strictly after start, defaulting to start plus the configured window
//! 5. title made of ASCII letters and digits only

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use quescheetah_common::{AppError, AppResult, IdGenerator, SharedClock};
use quescheetah_db::{
    entities::{question, question::QuestionType, url},
    repositories::{AnswerRepository, QuestionRepository, UrlRepository, UserAnswerRepository},
};
use sea_orm::{ConnectionTrait, Set};
use serde::Deserialize;
use validator::Validate;

use super::answer::{CreateAnswerInput, build_answer};
use crate::record::{AnswerWithCount, QuestionDetail};

/// Format of caller-supplied date-times, read as UTC.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub(crate) const TITLE_TAKEN: &str = "title already exists for this owner";
const START_IN_PAST: &str = "start must be later than now";
const END_BEFORE_START: &str = "end must be later than start";
const END_OUT_OF_RANGE: &str = "end falls outside the supported date range";
const TITLE_CHARSET: &str = "title may only contain letters and digits";
const INVALID_URL: &str = "enter a valid absolute URL";

const fn default_true() -> bool {
    true
}

/// Input for creating a question.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionInput {
    #[validate(length(min = 1, max = 50, message = "title must be 1 to 50 characters"))]
    pub question_title: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "text must be at most 100 characters"))]
    pub question_text: String,
    #[serde(default, rename = "type")]
    pub question_type: QuestionType,
    /// `%Y-%m-%dT%H:%M`; now when absent.
    #[serde(default)]
    pub start_dt: Option<String>,
    /// `%Y-%m-%dT%H:%M`; start plus the default window when absent.
    #[serde(default)]
    pub end_dt: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default = "default_true")]
    pub is_editable: bool,
    #[serde(default)]
    pub is_private: bool,
}

/// Input for creating a question together with its answers.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestionWithAnswersInput {
    #[serde(flatten)]
    pub question: CreateQuestionInput,
    #[serde(default)]
    pub answers: Vec<CreateAnswerInput>,
}

/// Input for updating a question. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuestionInput {
    #[validate(length(min = 1, max = 50, message = "title must be 1 to 50 characters"))]
    pub question_title: Option<String>,
    #[validate(length(max = 100, message = "text must be at most 100 characters"))]
    pub question_text: Option<String>,
    #[serde(rename = "type")]
    pub question_type: Option<QuestionType>,
    pub start_dt: Option<String>,
    pub end_dt: Option<String>,
    pub is_closed: Option<bool>,
    pub is_editable: Option<bool>,
    pub is_private: Option<bool>,
}

/// Input for attaching an access URL to a question.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUrlInput {
    #[validate(length(max = 100, message = "name must be at most 100 characters"))]
    pub url_name: Option<String>,
    #[validate(length(min = 1, max = 200, message = "URL must be 1 to 200 characters"))]
    pub full_url: String,
}

/// A question that passed every rule and is ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    pub api_key_id: String,
    pub question_type: QuestionType,
    pub question_title: String,
    pub question_text: String,
    pub start_dt: DateTime<Utc>,
    pub end_dt: DateTime<Utc>,
    pub is_closed: bool,
    pub is_editable: bool,
    pub is_private: bool,
}

impl ValidatedQuestion {
    fn into_active_model(
        self,
        id: String,
        multi_question_id: Option<String>,
        now: DateTime<Utc>,
    ) -> question::ActiveModel {
        question::ActiveModel {
            id: Set(id),
            api_key_id: Set(self.api_key_id),
            question_type: Set(self.question_type),
            multi_question_id: Set(multi_question_id),
            question_title: Set(self.question_title),
            question_text: Set(self.question_text),
            is_closed: Set(self.is_closed),
            start_dt: Set(self.start_dt.into()),
            end_dt: Set(self.end_dt.into()),
            is_editable: Set(self.is_editable),
            is_private: Set(self.is_private),
            created_dt: Set(now.into()),
            updated_dt: Set(now.into()),
        }
    }
}

/// Parse a caller-supplied date-time, tagging failures with `field`.
pub fn parse_datetime(field: &str, value: &str) -> AppResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| AppError::field(field, format!("expected date-time as {DATE_FORMAT}")))
}

/// Treat blank strings as absent.
fn supplied(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolve the start of the answering window.
pub fn resolve_start(value: Option<&str>, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    match supplied(value) {
        Some(raw) => {
            let start = parse_datetime("start_dt", raw)?;
            if start < now {
                return Err(AppError::field("start_dt", START_IN_PAST));
            }
            Ok(start)
        }
        None => Ok(now),
    }
}

/// Resolve the end of the answering window against an already resolved start.
pub fn resolve_end(
    value: Option<&str>,
    start: DateTime<Utc>,
    default_window: Duration,
) -> AppResult<DateTime<Utc>> {
    match supplied(value) {
        Some(raw) => {
            let end = parse_datetime("end_dt", raw)?;
            ensure_end_after_start(start, end)?;
            Ok(end)
        }
        None => {
            let end = start
                .checked_add_signed(default_window)
                .ok_or_else(|| AppError::field("end_dt", END_OUT_OF_RANGE))?;
            ensure_end_after_start(start, end)?;
            Ok(end)
        }
    }
}

fn ensure_end_after_start(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if end <= start {
        return Err(AppError::field("end_dt", END_BEFORE_START));
    }
    Ok(())
}

/// Reject titles with anything but ASCII letters and digits.
pub fn check_title_charset(title: &str) -> AppResult<()> {
    if title.is_empty() || !title.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::field("question_title", TITLE_CHARSET));
    }
    Ok(())
}

/// Fail unless `owner` owns `question`.
pub(crate) fn ensure_owner(question: &question::Model, owner: &str) -> AppResult<()> {
    if question.api_key_id != owner {
        return Err(AppError::Forbidden(
            "Not the owner of this question".to_string(),
        ));
    }
    Ok(())
}

/// Surface a unique index violation on the question table as the title rule.
pub(crate) fn title_conflict(err: AppError) -> AppError {
    match err {
        AppError::Conflict(_) => AppError::field("question_title", TITLE_TAKEN),
        other => other,
    }
}

fn log_created(question: &question::Model) {
    tracing::info!(
        question_id = %question.id,
        owner = %question.api_key_id,
        title = %question.question_title,
        "Created question"
    );
}

/// Question service for business logic.
#[derive(Clone)]
pub struct QuestionService {
    question_repo: QuestionRepository,
    url_repo: UrlRepository,
    answer_repo: AnswerRepository,
    user_answer_repo: UserAnswerRepository,
    clock: SharedClock,
    default_window: Duration,
    id_gen: IdGenerator,
}

impl QuestionService {
    /// Create a new question service.
    ///
    /// `default_duration_days` is the answering window used when no end is given.
    /// A window too large to represent makes every defaulted end an `end_dt` error.
    #[must_use]
    pub fn new(
        question_repo: QuestionRepository,
        url_repo: UrlRepository,
        answer_repo: AnswerRepository,
        user_answer_repo: UserAnswerRepository,
        clock: SharedClock,
        default_duration_days: i64,
    ) -> Self {
        Self {
            question_repo,
            url_repo,
            answer_repo,
            user_answer_repo,
            clock,
            default_window: Duration::try_days(default_duration_days).unwrap_or(Duration::MAX),
            id_gen: IdGenerator::new(),
        }
    }

    /// Run every creation rule without touching storage beyond the title lookup.
    pub async fn validate_new(
        &self,
        owner: &str,
        input: &CreateQuestionInput,
    ) -> AppResult<ValidatedQuestion> {
        if self
            .question_repo
            .title_taken(owner, &input.question_title, None)
            .await?
        {
            tracing::debug!(owner = %owner, title = %input.question_title, "Duplicate question title");
            return Err(AppError::field("question_title", TITLE_TAKEN));
        }
        input.validate()?;

        let start_dt = resolve_start(input.start_dt.as_deref(), self.clock.now())?;
        let end_dt = resolve_end(input.end_dt.as_deref(), start_dt, self.default_window)?;
        check_title_charset(&input.question_title)?;

        Ok(ValidatedQuestion {
            api_key_id: owner.to_string(),
            question_type: input.question_type,
            question_title: input.question_title.clone(),
            question_text: input.question_text.clone(),
            start_dt,
            end_dt,
            is_closed: input.is_closed,
            is_editable: input.is_editable,
            is_private: input.is_private,
        })
    }

    /// Persist a validated question, optionally as a member of a group.
    pub async fn persist(
        &self,
        validated: ValidatedQuestion,
        multi_question_id: Option<String>,
    ) -> AppResult<question::Model> {
        let model =
            validated.into_active_model(self.id_gen.generate(), multi_question_id, self.clock.now());

        let created = self
            .question_repo
            .create(model)
            .await
            .map_err(title_conflict)?;

        log_created(&created);
        Ok(created)
    }

    /// Validate and create a question.
    pub async fn create(
        &self,
        owner: &str,
        input: &CreateQuestionInput,
    ) -> AppResult<question::Model> {
        let validated = self.validate_new(owner, input).await?;
        self.persist(validated, None).await
    }

    /// Validate and create a question with its answers.
    ///
    /// Answers are checked before the question is written, and the question
    /// and its answers are committed together.
    pub async fn create_with_answers(
        &self,
        owner: &str,
        input: &CreateQuestionWithAnswersInput,
    ) -> AppResult<QuestionDetail> {
        for answer in &input.answers {
            answer.validate()?;
        }
        let validated = self.validate_new(owner, &input.question).await?;

        let txn = self.question_repo.begin().await?;
        let detail = self
            .persist_with_answers(&txn, validated, &input.answers, None)
            .await?;
        quescheetah_db::commit(txn).await?;

        Ok(detail)
    }

    /// Write a validated question and its (already validated) answers on `conn`.
    ///
    /// `conn` is an open transaction owned by the caller, who commits it.
    pub async fn persist_with_answers<C: ConnectionTrait>(
        &self,
        conn: &C,
        validated: ValidatedQuestion,
        answers: &[CreateAnswerInput],
        multi_question_id: Option<String>,
    ) -> AppResult<QuestionDetail> {
        let model =
            validated.into_active_model(self.id_gen.generate(), multi_question_id, self.clock.now());
        let question = QuestionRepository::create_in(conn, model)
            .await
            .map_err(title_conflict)?;
        log_created(&question);

        let mut created = Vec::with_capacity(answers.len());
        for answer in answers {
            let model = build_answer(
                self.id_gen.generate(),
                &question.id,
                answer,
                self.clock.now(),
            );
            created.push(AnswerWithCount {
                answer: AnswerRepository::create_in(conn, model).await?,
                answer_count: 0,
            });
        }

        Ok(QuestionDetail {
            question,
            answers: created,
            urls: Vec::new(),
        })
    }

    /// Get a question by ID.
    pub async fn get(&self, id: &str) -> AppResult<question::Model> {
        self.question_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question {id} not found")))
    }

    /// Get a question owned by `owner`.
    pub async fn get_owned(&self, owner: &str, id: &str) -> AppResult<question::Model> {
        let question = self.get(id).await?;
        ensure_owner(&question, owner)?;
        Ok(question)
    }

    /// Get a question the viewer may see. Private questions are owner-only.
    pub async fn get_visible(
        &self,
        viewer: Option<&str>,
        id: &str,
    ) -> AppResult<question::Model> {
        let question = self.get(id).await?;
        if question.is_private && viewer != Some(question.api_key_id.as_str()) {
            return Err(AppError::Forbidden("This question is private".to_string()));
        }
        Ok(question)
    }

    /// Get a visible question with its answers, counts and URLs.
    pub async fn get_detail(&self, viewer: Option<&str>, id: &str) -> AppResult<QuestionDetail> {
        let question = self.get_visible(viewer, id).await?;

        let mut answers = Vec::new();
        for answer in self.answer_repo.find_by_question(&question.id).await? {
            let answer_count = self.user_answer_repo.count_by_answer(&answer.id).await?;
            answers.push(AnswerWithCount {
                answer,
                answer_count,
            });
        }
        let urls = self.url_repo.find_by_question(&question.id).await?;

        Ok(QuestionDetail {
            question,
            answers,
            urls,
        })
    }

    /// Update a question, re-running the creation rules against the merged values.
    ///
    /// The title lookup skips the question itself, and the start is only
    /// checked against the clock when a new one is supplied.
    pub async fn update(
        &self,
        owner: &str,
        id: &str,
        input: &UpdateQuestionInput,
    ) -> AppResult<question::Model> {
        let existing = self.get_owned(owner, id).await?;

        let title = input
            .question_title
            .clone()
            .unwrap_or_else(|| existing.question_title.clone());
        if self
            .question_repo
            .title_taken(owner, &title, Some(&existing.id))
            .await?
        {
            return Err(AppError::field("question_title", TITLE_TAKEN));
        }
        input.validate()?;

        let now = self.clock.now();
        let start_dt = match supplied(input.start_dt.as_deref()) {
            Some(raw) => resolve_start(Some(raw), now)?,
            None => existing.start_dt.with_timezone(&Utc),
        };
        let end_dt = match supplied(input.end_dt.as_deref()) {
            Some(raw) => parse_datetime("end_dt", raw)?,
            None => existing.end_dt.with_timezone(&Utc),
        };
        ensure_end_after_start(start_dt, end_dt)?;
        check_title_charset(&title)?;

        let mut active: question::ActiveModel = existing.into();
        active.question_title = Set(title);
        if let Some(text) = &input.question_text {
            active.question_text = Set(text.clone());
        }
        if let Some(question_type) = input.question_type {
            active.question_type = Set(question_type);
        }
        active.start_dt = Set(start_dt.into());
        active.end_dt = Set(end_dt.into());
        if let Some(is_closed) = input.is_closed {
            active.is_closed = Set(is_closed);
        }
        if let Some(is_editable) = input.is_editable {
            active.is_editable = Set(is_editable);
        }
        if let Some(is_private) = input.is_private {
            active.is_private = Set(is_private);
        }
        active.updated_dt = Set(now.into());

        let updated = self
            .question_repo
            .update(active)
            .await
            .map_err(title_conflict)?;

        tracing::info!(question_id = %updated.id, "Updated question");
        Ok(updated)
    }

    /// Delete a question with its answers, URLs and responses.
    pub async fn delete(&self, owner: &str, id: &str) -> AppResult<()> {
        let question = self.get_owned(owner, id).await?;
        self.question_repo.delete(&question.id).await?;
        tracing::info!(question_id = %id, "Deleted question");
        Ok(())
    }

    /// Delete the listed questions owned by `owner`. Returns how many were removed.
    pub async fn delete_set(&self, owner: &str, ids: &[String]) -> AppResult<u64> {
        let deleted = self.question_repo.delete_many_for_owner(owner, ids).await?;
        tracing::info!(owner = %owner, requested = ids.len(), deleted, "Deleted question set");
        Ok(deleted)
    }

    /// Attach an access URL to a question.
    pub async fn add_url(
        &self,
        owner: &str,
        question_id: &str,
        input: &CreateUrlInput,
    ) -> AppResult<url::Model> {
        let question = self.get_owned(owner, question_id).await?;
        input.validate()?;
        ::url::Url::parse(input.full_url.trim())
            .map_err(|_| AppError::field("full_url", INVALID_URL))?;

        let now = self.clock.now();
        let model = url::ActiveModel {
            id: Set(self.id_gen.generate()),
            question_id: Set(question.id),
            url_name: Set(input.url_name.clone()),
            full_url: Set(input.full_url.trim().to_string()),
            created_dt: Set(now.into()),
            updated_dt: Set(now.into()),
        };

        self.url_repo.create(model).await
    }

    /// List the access URLs of a question owned by `owner`.
    pub async fn list_urls(&self, owner: &str, question_id: &str) -> AppResult<Vec<url::Model>> {
        let question = self.get_owned(owner, question_id).await?;
        self.url_repo.find_by_question(&question.id).await
    }
}
