//! Create the status lookup tables.
//!
//! Rows are seeded by the application (`initial_setup`), not here.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in StatusTable::ALL {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Lookup::Id)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Lookup::Name).string_len(64).not_null())
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in StatusTable::ALL {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
pub enum StatusTable {
    ProjectStatus,
    LaunchStatus,
    TestRunStatus,
    TestSuiteStatus,
    TestStatus,
    TestResolution,
}

impl StatusTable {
    const ALL: [StatusTable; 6] = [
        Self::ProjectStatus,
        Self::LaunchStatus,
        Self::TestRunStatus,
        Self::TestSuiteStatus,
        Self::TestStatus,
        Self::TestResolution,
    ];
}

/// Columns shared by every lookup table.
#[derive(DeriveIden)]
pub enum Lookup {
    Id,
    Name,
}
