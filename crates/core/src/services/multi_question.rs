//! Multi-question (group) service.

use std::collections::HashSet;

use quescheetah_common::{AppError, AppResult, IdGenerator, SharedClock};
use quescheetah_db::{
    entities::multi_question,
    repositories::{MultiQuestionRepository, QuestionRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::question::{
    CreateQuestionWithAnswersInput, QuestionService, TITLE_TAKEN, ValidatedQuestion,
};
use crate::record::{MultiQuestionRecord, QuestionDetail, Record, ToRecord, records};
use quescheetah_db::entities::question;

/// Input for creating a group of questions.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMultiQuestionInput {
    /// Blank means "no group": every question is created on its own.
    #[serde(default)]
    #[validate(length(max = 100, message = "group name must be at most 100 characters"))]
    pub group_name: String,
    #[serde(default)]
    pub questions: Vec<CreateQuestionWithAnswersInput>,
}

/// Result of creating a group.
#[derive(Debug, Clone)]
pub struct CreatedGroup {
    /// `None` when the group name was blank.
    pub group: Option<multi_question::Model>,
    pub questions: Vec<QuestionDetail>,
}

impl ToRecord for CreatedGroup {
    fn to_record(&self) -> Record {
        let mut record = match &self.group {
            Some(group) => {
                let members: Vec<question::Model> =
                    self.questions.iter().map(|d| d.question.clone()).collect();
                MultiQuestionRecord {
                    group,
                    question_elements: &members,
                }
                .to_record()
            }
            None => Record::new(),
        };
        record.insert("questions".to_string(), records(&self.questions));
        record
    }
}

/// A stored group with its member questions.
#[derive(Debug, Clone)]
pub struct GroupWithMembers {
    pub group: multi_question::Model,
    pub members: Vec<question::Model>,
}

impl ToRecord for GroupWithMembers {
    fn to_record(&self) -> Record {
        let mut record = MultiQuestionRecord {
            group: &self.group,
            question_elements: &self.members,
        }
        .to_record();
        record.insert("questions".to_string(), records(&self.members));
        record
    }
}

/// Multi-question service for business logic.
#[derive(Clone)]
pub struct MultiQuestionService {
    multi_question_repo: MultiQuestionRepository,
    question_repo: QuestionRepository,
    question_service: QuestionService,
    clock: SharedClock,
    id_gen: IdGenerator,
}

impl MultiQuestionService {
    /// Create a new multi-question service.
    #[must_use]
    pub const fn new(
        multi_question_repo: MultiQuestionRepository,
        question_repo: QuestionRepository,
        question_service: QuestionService,
        clock: SharedClock,
    ) -> Self {
        Self {
            multi_question_repo,
            question_repo,
            question_service,
            clock,
            id_gen: IdGenerator::new(),
        }
    }

    /// Validate every member, then write the group and its questions.
    ///
    /// Titles must also be distinct within the batch. All rows are committed
    /// in one transaction, so a failed member leaves no group behind.
    pub async fn create(
        &self,
        owner: &str,
        input: &CreateMultiQuestionInput,
    ) -> AppResult<CreatedGroup> {
        input.validate()?;
        if input.questions.is_empty() {
            return Err(AppError::field(
                "questions",
                "at least one question is required",
            ));
        }

        let mut seen = HashSet::new();
        let mut validated: Vec<ValidatedQuestion> = Vec::with_capacity(input.questions.len());
        for member in &input.questions {
            for answer in &member.answers {
                answer.validate()?;
            }
            let checked = self
                .question_service
                .validate_new(owner, &member.question)
                .await?;
            if !seen.insert(checked.question_title.clone()) {
                return Err(AppError::field("question_title", TITLE_TAKEN));
            }
            validated.push(checked);
        }

        let txn = self.multi_question_repo.begin().await?;

        let group_name = input.group_name.trim();
        let group = if group_name.is_empty() {
            None
        } else {
            let now = self.clock.now();
            let model = multi_question::ActiveModel {
                id: Set(self.id_gen.generate()),
                api_key_id: Set(owner.to_string()),
                group_name: Set(group_name.to_string()),
                created_dt: Set(now.into()),
                updated_dt: Set(now.into()),
            };
            Some(MultiQuestionRepository::create_in(&txn, model).await?)
        };

        let group_id = group.as_ref().map(|g| g.id.clone());
        let mut questions = Vec::with_capacity(validated.len());
        for (checked, member) in validated.into_iter().zip(&input.questions) {
            questions.push(
                self.question_service
                    .persist_with_answers(&txn, checked, &member.answers, group_id.clone())
                    .await?,
            );
        }
        quescheetah_db::commit(txn).await?;

        tracing::info!(
            owner = %owner,
            group_id = group_id.as_deref().unwrap_or("-"),
            count = questions.len(),
            "Created question group"
        );

        Ok(CreatedGroup { group, questions })
    }

    async fn get_owned(&self, owner: &str, id: &str) -> AppResult<multi_question::Model> {
        let group = self
            .multi_question_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question group {id} not found")))?;
        if group.api_key_id != owner {
            return Err(AppError::Forbidden(
                "Not the owner of this question group".to_string(),
            ));
        }
        Ok(group)
    }

    /// Get a group owned by `owner` with its member questions.
    pub async fn get(&self, owner: &str, id: &str) -> AppResult<GroupWithMembers> {
        let group = self.get_owned(owner, id).await?;
        let members = self.question_repo.find_by_multi_question(&group.id).await?;
        Ok(GroupWithMembers { group, members })
    }

    /// Delete a group and every member question. Returns the number of members removed.
    pub async fn delete(&self, owner: &str, id: &str) -> AppResult<u64> {
        let group = self.get_owned(owner, id).await?;
        let removed = self
            .multi_question_repo
            .delete_with_members(&group.id)
            .await?;
        tracing::info!(group_id = %group.id, removed, "Deleted question group");
        Ok(removed)
    }
}
