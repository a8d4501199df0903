//! Create test_history table.
//!
//! Status tallies group this table by test_run_id and test_suite_history_id,
//! so both carry an index.

use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_status_tables::{Lookup, StatusTable};
use super::m20240601_000003_create_test_runs::TestRun;
use super::m20240601_000004_create_test_suites_and_tests::Test;
use super::m20240601_000005_create_test_suite_history::TestSuiteHistory;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestHistory::StartDatetime).timestamp().not_null())
                    .col(ColumnDef::new(TestHistory::EndDatetime).timestamp())
                    .col(ColumnDef::new(TestHistory::Trace).text())
                    .col(ColumnDef::new(TestHistory::File).text())
                    .col(ColumnDef::new(TestHistory::Message).text())
                    .col(ColumnDef::new(TestHistory::ErrorType).text())
                    .col(ColumnDef::new(TestHistory::Retries).integer())
                    .col(ColumnDef::new(TestHistory::TestId).integer().not_null())
                    .col(ColumnDef::new(TestHistory::TestRunId).integer().not_null())
                    .col(
                        ColumnDef::new(TestHistory::TestSuiteHistoryId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TestHistory::TestStatusId).integer().not_null())
                    .col(
                        ColumnDef::new(TestHistory::TestResolutionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TestHistory::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestHistory::Table, TestHistory::TestId)
                            .to(Test::Table, Test::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestHistory::Table, TestHistory::TestRunId)
                            .to(TestRun::Table, TestRun::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestHistory::Table, TestHistory::TestSuiteHistoryId)
                            .to(TestSuiteHistory::Table, TestSuiteHistory::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestHistory::Table, TestHistory::TestStatusId)
                            .to(StatusTable::TestStatus, Lookup::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestHistory::Table, TestHistory::TestResolutionId)
                            .to(StatusTable::TestResolution, Lookup::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_history_test_run_id")
                    .table(TestHistory::Table)
                    .col(TestHistory::TestRunId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_history_test_suite_history_id")
                    .table(TestHistory::Table)
                    .col(TestHistory::TestSuiteHistoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_history_test_status_id")
                    .table(TestHistory::Table)
                    .col(TestHistory::TestStatusId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TestHistory {
    Table,
    Id,
    StartDatetime,
    EndDatetime,
    Trace,
    File,
    Message,
    ErrorType,
    Retries,
    TestId,
    TestRunId,
    TestSuiteHistoryId,
    TestStatusId,
    TestResolutionId,
    CreatedAt,
}
