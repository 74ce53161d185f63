//! Answer entity: a selectable option of a question.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "answer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub question_id: String,

    pub answer_text: String,

    /// Optional display number of the option.
    #[sea_orm(nullable)]
    pub answer_num: Option<i32>,

    pub created_dt: DateTimeWithTimeZone,

    pub updated_dt: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_delete = "Cascade"
    )]
    Question,

    #[sea_orm(has_many = "super::user_answer::Entity")]
    UserAnswer,
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::user_answer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAnswer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
