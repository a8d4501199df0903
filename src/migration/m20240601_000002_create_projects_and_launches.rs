//! Create project and launch tables.

use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_status_tables::{Lookup, StatusTable};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Project::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Project::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Project::Data).json())
                    .col(ColumnDef::new(Project::ProjectStatusId).integer().not_null())
                    .col(
                        ColumnDef::new(Project::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Project::Table, Project::ProjectStatusId)
                            .to(StatusTable::ProjectStatus, Lookup::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Not unique: names are deduplicated by lookup before insert.
        manager
            .create_index(
                Index::create()
                    .name("idx_project_name")
                    .table(Project::Table)
                    .col(Project::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Launch::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Launch::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Launch::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Launch::Data).json())
                    .col(ColumnDef::new(Launch::ProjectId).integer().not_null())
                    .col(ColumnDef::new(Launch::LaunchStatusId).integer().not_null())
                    .col(
                        ColumnDef::new(Launch::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Launch::Table, Launch::ProjectId)
                            .to(Project::Table, Project::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Launch::Table, Launch::LaunchStatusId)
                            .to(StatusTable::LaunchStatus, Lookup::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_launch_project_id")
                    .table(Launch::Table)
                    .col(Launch::ProjectId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Launch::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Project::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Project {
    Table,
    Id,
    Name,
    Data,
    ProjectStatusId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Launch {
    Table,
    Id,
    Name,
    Data,
    ProjectId,
    LaunchStatusId,
    CreatedAt,
}
