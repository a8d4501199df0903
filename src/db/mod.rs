//! Database module providing connection management, migrations, and queries.
//!
//! All queries are methods on [`DbPool`], which handlers receive as
//! `web::Data<DbPool>`. Nothing here holds global state.

pub mod launches;
pub mod projects;
pub mod seed;
pub mod tallies;
pub mod test_runs;
pub mod test_suites;
pub mod test_executions;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::{Config, DatabaseConfig};
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

pub use tallies::TallyParent;
pub use test_runs::NewTestRun;
pub use test_suites::NewTestSuiteHistory;
pub use test_executions::{NewTestHistory, SuiteBreakdown, TestHistoryFilter, TestOutcome, TestRunBreakdown};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        Self::connect(&config.database).await
    }

    /// Connect using explicit database settings.
    pub async fn connect(settings: &DatabaseConfig) -> AppResult<Self> {
        let mut options = ConnectOptions::new(settings.url.clone());
        options
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .connect_timeout(settings.connect_timeout)
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        Ok(DbPool { conn })
    }

    /// Get access to the underlying connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply all pending schema migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(self.connection(), None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))?;

        info!("Database migrations complete");
        Ok(())
    }
}

/// Result of a find-or-create lookup.
///
/// Lookups are not atomic: two concurrent callers may both miss and insert.
#[derive(Debug, Clone, PartialEq)]
pub enum FindOrCreate<T> {
    Found(T),
    Created(T),
}

impl<T> FindOrCreate<T> {
    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Self::Found(value) | Self::Created(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Found(value) | Self::Created(value) => value,
        }
    }
}
