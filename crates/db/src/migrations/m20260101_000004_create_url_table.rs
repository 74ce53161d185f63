//! Create url table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Url::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Url::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Url::QuestionId).string_len(32).not_null())
                    .col(ColumnDef::new(Url::UrlName).string_len(100))
                    .col(ColumnDef::new(Url::FullUrl).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Url::CreatedDt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Url::UpdatedDt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_url_question")
                            .from(Url::Table, Url::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_url_question_id")
                    .table(Url::Table)
                    .col(Url::QuestionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Url::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Url {
    Table,
    Id,
    QuestionId,
    UrlName,
    FullUrl,
    CreatedDt,
    UpdatedDt,
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
}
