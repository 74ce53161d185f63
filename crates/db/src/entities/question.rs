//! Question entity: a single poll or survey item.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of question.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(60))")]
pub enum QuestionType {
    /// Free-standing survey item.
    #[sea_orm(string_value = "SURV")]
    #[serde(rename = "SURV", alias = "SURVEY")]
    Survey,
    /// Pick-one vote.
    #[default]
    #[sea_orm(string_value = "VOTE")]
    #[serde(rename = "VOTE")]
    Vote,
}

impl QuestionType {
    /// The code stored in the `type` column.
    #[must_use]
    pub const fn as_code(self) -> &'static str {
        match self {
            Self::Survey => "SURV",
            Self::Vote => "VOTE",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner; titles are unique per owner.
    #[sea_orm(indexed)]
    pub api_key_id: String,

    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub question_type: QuestionType,

    /// Group this question belongs to, if any.
    #[sea_orm(nullable, indexed)]
    pub multi_question_id: Option<String>,

    pub question_title: String,

    pub question_text: String,

    #[sea_orm(default_value = false)]
    pub is_closed: bool,

    pub start_dt: DateTimeWithTimeZone,

    pub end_dt: DateTimeWithTimeZone,

    /// Whether respondents may change their answer.
    #[sea_orm(default_value = true)]
    pub is_editable: bool,

    #[sea_orm(default_value = false)]
    pub is_private: bool,

    pub created_dt: DateTimeWithTimeZone,

    pub updated_dt: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::api_key::Entity",
        from = "Column::ApiKeyId",
        to = "super::api_key::Column::Id",
        on_delete = "Cascade"
    )]
    ApiKey,

    #[sea_orm(
        belongs_to = "super::multi_question::Entity",
        from = "Column::MultiQuestionId",
        to = "super::multi_question::Column::Id",
        on_delete = "SetNull"
    )]
    MultiQuestion,

    #[sea_orm(has_many = "super::url::Entity")]
    Url,

    #[sea_orm(has_many = "super::answer::Entity")]
    Answer,
}

impl Related<super::api_key::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApiKey.def()
    }
}

impl Related<super::multi_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MultiQuestion.def()
    }
}

impl Related<super::url::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Url.def()
    }
}

impl Related<super::answer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_codes() {
        assert_eq!(QuestionType::Survey.as_code(), "SURV");
        assert_eq!(QuestionType::Vote.as_code(), "VOTE");
        assert_eq!(QuestionType::default(), QuestionType::Vote);
    }

    #[test]
    fn test_question_type_serde_uses_codes() {
        let json = serde_json::to_string(&QuestionType::Survey).unwrap_or_default();
        assert_eq!(json, "\"SURV\"");

        let parsed: Option<QuestionType> = serde_json::from_str("\"SURVEY\"").ok();
        assert_eq!(parsed, Some(QuestionType::Survey));
    }
}
