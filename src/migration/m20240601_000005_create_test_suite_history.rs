//! Create test_suite_history table.

use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_status_tables::{Lookup, StatusTable};
use super::m20240601_000003_create_test_runs::TestRun;
use super::m20240601_000004_create_test_suites_and_tests::TestSuite;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestSuiteHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestSuiteHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestSuiteHistory::Data).json())
                    .col(
                        ColumnDef::new(TestSuiteHistory::StartDatetime)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TestSuiteHistory::EndDatetime).timestamp())
                    .col(
                        ColumnDef::new(TestSuiteHistory::TestSuiteId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TestSuiteHistory::TestRunId).integer().not_null())
                    .col(
                        ColumnDef::new(TestSuiteHistory::TestSuiteStatusId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TestSuiteHistory::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestSuiteHistory::Table, TestSuiteHistory::TestSuiteId)
                            .to(TestSuite::Table, TestSuite::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestSuiteHistory::Table, TestSuiteHistory::TestRunId)
                            .to(TestRun::Table, TestRun::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestSuiteHistory::Table, TestSuiteHistory::TestSuiteStatusId)
                            .to(StatusTable::TestSuiteStatus, Lookup::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_suite_history_test_run_id")
                    .table(TestSuiteHistory::Table)
                    .col(TestSuiteHistory::TestRunId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestSuiteHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TestSuiteHistory {
    Table,
    Id,
    Data,
    StartDatetime,
    EndDatetime,
    TestSuiteId,
    TestRunId,
    TestSuiteStatusId,
    CreatedAt,
}
