//! Create question table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Question::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Question::ApiKeyId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Question::Type)
                            .string_len(60)
                            .not_null()
                            .default("VOTE"),
                    )
                    .col(ColumnDef::new(Question::MultiQuestionId).string_len(32))
                    .col(
                        ColumnDef::new(Question::QuestionTitle)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Question::QuestionText)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Question::IsClosed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Question::StartDt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Question::EndDt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Question::IsEditable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Question::IsPrivate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Question::CreatedDt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Question::UpdatedDt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_api_key")
                            .from(Question::Table, Question::ApiKeyId)
                            .to(ApiKey::Table, ApiKey::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_multi_question")
                            .from(Question::Table, Question::MultiQuestionId)
                            .to(MultiQuestion::Table, MultiQuestion::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (api_key_id, question_title) - titles are unique per owner
        manager
            .create_index(
                Index::create()
                    .name("idx_question_api_key_title")
                    .table(Question::Table)
                    .col(Question::ApiKeyId)
                    .col(Question::QuestionTitle)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: multi_question_id (for listing group members)
        manager
            .create_index(
                Index::create()
                    .name("idx_question_multi_question_id")
                    .table(Question::Table)
                    .col(Question::MultiQuestionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
    ApiKeyId,
    Type,
    MultiQuestionId,
    QuestionTitle,
    QuestionText,
    IsClosed,
    StartDt,
    EndDt,
    IsEditable,
    IsPrivate,
    CreatedDt,
    UpdatedDt,
}

#[derive(Iden)]
enum ApiKey {
    Table,
    Id,
}

#[derive(Iden)]
enum MultiQuestion {
    Table,
    Id,
}
