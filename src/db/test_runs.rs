//! Database queries for test runs.

use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::Value as JsonValue;

use crate::entity::launch::{self, Entity as Launch};
use crate::entity::test_run::{self, ActiveModel, Entity as TestRun};
use crate::error::{AppError, AppResult};
use crate::models::StatusTally;
use crate::models::status::{RunStatus, StatusLookup};

use super::{DbPool, TallyParent};

/// Represents a test run to be inserted.
#[derive(Debug, Clone)]
pub struct NewTestRun {
    pub data: Option<JsonValue>,
    pub start_datetime: NaiveDateTime,
    pub test_type: Option<String>,
    pub launch_id: i32,
}

impl DbPool {
    /// Insert a new test run in Running status with no end time.
    pub async fn insert_test_run(&self, run: NewTestRun) -> AppResult<test_run::Model> {
        let model = ActiveModel {
            data: Set(run.data),
            start_datetime: Set(run.start_datetime),
            end_datetime: Set(None),
            test_type: Set(run.test_type),
            launch_id: Set(run.launch_id),
            test_run_status_id: Set(RunStatus::Running.id()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test run: {}", e)))?;

        Ok(result)
    }

    /// Get a test run and its launch by test run ID.
    pub async fn get_test_run_by_id(
        &self,
        id: i32,
    ) -> AppResult<Option<(test_run::Model, Option<launch::Model>)>> {
        let result = TestRun::find_by_id(id)
            .find_also_related(Launch)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test run: {}", e)))?;

        Ok(result)
    }

    /// Close a test run.
    ///
    /// A caller-supplied status is stored as is; without one the status is
    /// derived from the run's test executions. `data` only overwrites when present.
    /// Returns `None` when the test run does not exist.
    pub async fn close_test_run(
        &self,
        id: i32,
        end_datetime: NaiveDateTime,
        data: Option<JsonValue>,
        status: Option<RunStatus>,
    ) -> AppResult<Option<test_run::Model>> {
        let Some(run) = TestRun::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test run: {}", e)))?
        else {
            return Ok(None);
        };

        let status = match status {
            Some(status) => status,
            None => RunStatus::from_failed_count(
                self.count_failed_tests(TallyParent::TestRun, id).await?,
            ),
        };

        let mut active: ActiveModel = run.into();
        active.end_datetime = Set(Some(end_datetime));
        active.test_run_status_id = Set(status.id());
        if data.is_some() {
            active.data = Set(data);
        }

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to close test run: {}", e)))?;

        Ok(Some(result))
    }

    /// All test runs of a launch with their test status tallies.
    pub async fn get_test_runs_by_launch_id(
        &self,
        launch_id: i32,
    ) -> AppResult<Vec<(test_run::Model, StatusTally)>> {
        let runs = TestRun::find()
            .filter(test_run::Column::LaunchId.eq(launch_id))
            .order_by_asc(test_run::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test runs: {}", e)))?;

        let run_ids: Vec<i32> = runs.iter().map(|r| r.id).collect();
        let tallies = self.tally_tests(TallyParent::TestRun, &run_ids).await?;

        Ok(runs
            .into_iter()
            .map(|run| {
                let tally = tallies.get(&run.id).copied().unwrap_or_default();
                (run, tally)
            })
            .collect())
    }
}
