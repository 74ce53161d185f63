//! Create multi_question table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MultiQuestion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MultiQuestion::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MultiQuestion::ApiKeyId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MultiQuestion::GroupName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MultiQuestion::CreatedDt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MultiQuestion::UpdatedDt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_multi_question_api_key")
                            .from(MultiQuestion::Table, MultiQuestion::ApiKeyId)
                            .to(ApiKey::Table, ApiKey::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_multi_question_api_key_id")
                    .table(MultiQuestion::Table)
                    .col(MultiQuestion::ApiKeyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MultiQuestion::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MultiQuestion {
    Table,
    Id,
    ApiKeyId,
    GroupName,
    CreatedDt,
    UpdatedDt,
}

#[derive(Iden)]
enum ApiKey {
    Table,
    Id,
}
