//! Create test_run table.

use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_status_tables::{Lookup, StatusTable};
use super::m20240601_000002_create_projects_and_launches::Launch;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestRun::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestRun::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestRun::Data).json())
                    .col(ColumnDef::new(TestRun::StartDatetime).timestamp().not_null())
                    .col(ColumnDef::new(TestRun::EndDatetime).timestamp())
                    .col(ColumnDef::new(TestRun::TestType).string_len(255))
                    .col(ColumnDef::new(TestRun::LaunchId).integer().not_null())
                    .col(ColumnDef::new(TestRun::TestRunStatusId).integer().not_null())
                    .col(
                        ColumnDef::new(TestRun::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestRun::Table, TestRun::LaunchId)
                            .to(Launch::Table, Launch::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestRun::Table, TestRun::TestRunStatusId)
                            .to(StatusTable::TestRunStatus, Lookup::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_run_launch_id")
                    .table(TestRun::Table)
                    .col(TestRun::LaunchId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestRun::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TestRun {
    Table,
    Id,
    Data,
    StartDatetime,
    EndDatetime,
    TestType,
    LaunchId,
    TestRunStatusId,
    CreatedAt,
}
