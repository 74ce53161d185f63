//! API key entity: the owner account that questions are scoped to.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "api_key")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Display name of the owner.
    pub name: String,

    /// SHA-256 hex digest of the secret. The secret itself is never stored.
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub key_hash: String,

    pub created_dt: DateTimeWithTimeZone,

    pub updated_dt: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::question::Entity")]
    Question,

    #[sea_orm(has_many = "super::multi_question::Entity")]
    MultiQuestion,
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::multi_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MultiQuestion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
