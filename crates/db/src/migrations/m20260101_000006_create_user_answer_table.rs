//! Create user_answer table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserAnswer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserAnswer::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserAnswer::AnswerId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(UserAnswer::QuestionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserAnswer::UniqueUser)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserAnswer::CreatedDt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserAnswer::UpdatedDt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_answer_answer")
                            .from(UserAnswer::Table, UserAnswer::AnswerId)
                            .to(Answer::Table, Answer::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_answer_question")
                            .from(UserAnswer::Table, UserAnswer::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (question_id, unique_user) - one answer per respondent per question
        manager
            .create_index(
                Index::create()
                    .name("idx_user_answer_question_user")
                    .table(UserAnswer::Table)
                    .col(UserAnswer::QuestionId)
                    .col(UserAnswer::UniqueUser)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: answer_id (for answer counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_answer_answer_id")
                    .table(UserAnswer::Table)
                    .col(UserAnswer::AnswerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserAnswer::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserAnswer {
    Table,
    Id,
    AnswerId,
    QuestionId,
    UniqueUser,
    CreatedDt,
    UpdatedDt,
}

#[derive(Iden)]
enum Answer {
    Table,
    Id,
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
}
