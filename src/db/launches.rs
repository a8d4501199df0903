//! Database queries for launches.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::Value as JsonValue;

use crate::entity::launch::{self, ActiveModel, Entity as Launch};
use crate::entity::project::{self, Entity as Project};
use crate::entity::test_run::{self, Entity as TestRun};
use crate::error::{AppError, AppResult};
use crate::models::StatusTally;
use crate::models::status::{RunStatus, StatusLookup};

use super::{DbPool, TallyParent};

/// A launch with a status tally for each of its test runs.
#[derive(Debug, Clone)]
pub struct LaunchWithRuns {
    pub launch: launch::Model,
    pub test_runs: Vec<(test_run::Model, StatusTally)>,
}

impl DbPool {
    /// Insert a new launch in Running status.
    pub async fn insert_launch(
        &self,
        name: &str,
        data: Option<JsonValue>,
        project_id: i32,
    ) -> AppResult<launch::Model> {
        let model = ActiveModel {
            name: Set(name.to_string()),
            data: Set(data),
            project_id: Set(project_id),
            launch_status_id: Set(RunStatus::Running.id()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert launch: {}", e)))?;

        Ok(result)
    }

    /// Get a launch and its project by launch ID.
    pub async fn get_launch_by_id(
        &self,
        id: i32,
    ) -> AppResult<Option<(launch::Model, Option<project::Model>)>> {
        let result = Launch::find_by_id(id)
            .find_also_related(Project)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get launch: {}", e)))?;

        Ok(result)
    }

    /// Count the launch's test runs that ended Failed.
    pub async fn count_failed_test_runs(&self, launch_id: i32) -> AppResult<u64> {
        let count = TestRun::find()
            .filter(test_run::Column::LaunchId.eq(launch_id))
            .filter(test_run::Column::TestRunStatusId.eq(RunStatus::Failed.id()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count failed test runs: {}", e)))?;

        Ok(count)
    }

    /// Close a launch: Failed if any of its test runs failed, otherwise Successful.
    ///
    /// Returns `None` when the launch does not exist.
    pub async fn finish_launch(&self, launch_id: i32) -> AppResult<Option<launch::Model>> {
        let Some(launch) = Launch::find_by_id(launch_id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get launch: {}", e)))?
        else {
            return Ok(None);
        };

        let failed = self.count_failed_test_runs(launch_id).await?;
        let status = RunStatus::from_failed_count(failed);

        let mut active: ActiveModel = launch.into();
        active.launch_status_id = Set(status.id());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to finish launch: {}", e)))?;

        Ok(Some(result))
    }

    /// All launches of a project, each with per-test-run tallies.
    pub async fn get_launches_by_project_id(
        &self,
        project_id: i32,
    ) -> AppResult<Vec<LaunchWithRuns>> {
        let launches = Launch::find()
            .filter(launch::Column::ProjectId.eq(project_id))
            .order_by_asc(launch::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get launches: {}", e)))?;

        if launches.is_empty() {
            return Ok(Vec::new());
        }

        let launch_ids: Vec<i32> = launches.iter().map(|l| l.id).collect();
        let runs = TestRun::find()
            .filter(test_run::Column::LaunchId.is_in(launch_ids))
            .order_by_asc(test_run::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test runs: {}", e)))?;

        let run_ids: Vec<i32> = runs.iter().map(|r| r.id).collect();
        let tallies = self.tally_tests(TallyParent::TestRun, &run_ids).await?;

        let mut grouped: Vec<LaunchWithRuns> = launches
            .into_iter()
            .map(|launch| LaunchWithRuns {
                launch,
                test_runs: Vec::new(),
            })
            .collect();

        for run in runs {
            let tally = tallies.get(&run.id).copied().unwrap_or_default();
            if let Some(entry) = grouped.iter_mut().find(|g| g.launch.id == run.launch_id) {
                entry.test_runs.push((run, tally));
            }
        }

        Ok(grouped)
    }
}
