//! Seeding of the fixed status lookup tables.

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::status::{ProjectStatus, RunStatus, StatusLookup, TestResolution, TestStatus};

use super::DbPool;

impl DbPool {
    /// Insert every status row that is not already present.
    ///
    /// Idempotent; safe to call on every startup.
    pub async fn seed_status_tables(&self) -> AppResult<()> {
        let statements = [
            seed_statement::<ProjectStatus>("project_status"),
            seed_statement::<RunStatus>("launch_status"),
            seed_statement::<RunStatus>("test_run_status"),
            seed_statement::<RunStatus>("test_suite_status"),
            seed_statement::<TestStatus>("test_status"),
            seed_statement::<TestResolution>("test_resolution"),
        ];

        for sql in statements {
            self.connection()
                .execute_unprepared(&sql)
                .await
                .map_err(|e| AppError::Database(format!("Failed to seed status table: {}", e)))?;
        }

        info!("Status lookup tables seeded");
        Ok(())
    }
}

/// Build the insert for one lookup table from its enumeration.
fn seed_statement<S: StatusLookup>(table: &str) -> String {
    let rows = S::ALL
        .iter()
        .map(|status| format!("({}, '{}')", status.id(), status.as_str().replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} (id, name) VALUES {} ON CONFLICT (id) DO NOTHING",
        table, rows
    )
}
