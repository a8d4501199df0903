//! SeaORM database migrations.
//!
//! Written with the schema builder so the same migrations run on PostgreSQL
//! and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_status_tables;
mod m20240601_000002_create_projects_and_launches;
mod m20240601_000003_create_test_runs;
mod m20240601_000005_create_test_suite_history;
mod m20240601_000006_create_test_history;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_status_tables::Migration),
            Box::new(m20240601_000002_create_projects_and_launches::Migration),
            Box::new(m20240601_000003_create_test_runs::Migration),
            Box::new(m20240601_000004_create_test_suites_and_tests::Migration),
            Box::new(m20240601_000005_create_test_suite_history::Migration),
            Box::new(m20240601_000006_create_test_history::Migration),
        ]
    }
}
