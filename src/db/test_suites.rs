//! Database queries for test suites and their per-run histories.

use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::Value as JsonValue;

use crate::entity::test_suite::{self, ActiveModel as TestSuiteActiveModel, Entity as TestSuite};
use crate::entity::test_suite_history::{
    self, ActiveModel as HistoryActiveModel, Entity as TestSuiteHistory,
};
use crate::error::{AppError, AppResult};
use crate::models::status::{RunStatus, StatusLookup};

use super::{DbPool, FindOrCreate, TallyParent};

/// Represents a test suite history to be inserted.
#[derive(Debug, Clone)]
pub struct NewTestSuiteHistory {
    pub data: Option<JsonValue>,
    pub start_datetime: NaiveDateTime,
    pub test_run_id: i32,
    pub test_suite_id: i32,
}

impl DbPool {
    /// Find a suite by name within a project; an absent test type matches NULL.
    pub async fn find_test_suite(
        &self,
        name: &str,
        project_id: i32,
        test_type: Option<&str>,
    ) -> AppResult<Option<test_suite::Model>> {
        let type_filter = match test_type {
            Some(test_type) => test_suite::Column::TestType.eq(test_type),
            None => test_suite::Column::TestType.is_null(),
        };

        let result = TestSuite::find()
            .filter(test_suite::Column::Name.eq(name))
            .filter(test_suite::Column::ProjectId.eq(project_id))
            .filter(type_filter)
            .order_by_asc(test_suite::Column::Id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find test suite: {}", e)))?;

        Ok(result)
    }

    /// Insert a new test suite.
    pub async fn insert_test_suite(
        &self,
        name: &str,
        project_id: i32,
        test_type: Option<&str>,
        data: Option<JsonValue>,
    ) -> AppResult<test_suite::Model> {
        let model = TestSuiteActiveModel {
            name: Set(name.to_string()),
            test_type: Set(test_type.map(str::to_string)),
            data: Set(data),
            project_id: Set(project_id),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test suite: {}", e)))?;

        Ok(result)
    }

    /// Return the suite keyed by (name, project, test type), creating it if needed.
    pub async fn find_or_create_test_suite(
        &self,
        name: &str,
        project_id: i32,
        test_type: Option<&str>,
    ) -> AppResult<FindOrCreate<test_suite::Model>> {
        if let Some(existing) = self.find_test_suite(name, project_id, test_type).await? {
            return Ok(FindOrCreate::Found(existing));
        }

        let created = self
            .insert_test_suite(name, project_id, test_type, None)
            .await?;
        Ok(FindOrCreate::Created(created))
    }

    /// Get a single test suite by ID.
    pub async fn get_test_suite_by_id(&self, id: i32) -> AppResult<Option<test_suite::Model>> {
        let result = TestSuite::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test suite: {}", e)))?;

        Ok(result)
    }

    /// Insert a new suite history in Running status.
    pub async fn insert_test_suite_history(
        &self,
        history: NewTestSuiteHistory,
    ) -> AppResult<test_suite_history::Model> {
        let model = HistoryActiveModel {
            data: Set(history.data),
            start_datetime: Set(history.start_datetime),
            end_datetime: Set(None),
            test_suite_id: Set(history.test_suite_id),
            test_run_id: Set(history.test_run_id),
            test_suite_status_id: Set(RunStatus::Running.id()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let result = model.insert(self.connection()).await.map_err(|e| {
            AppError::Database(format!("Failed to insert test suite history: {}", e))
        })?;

        Ok(result)
    }

    /// Get a single suite history by ID.
    pub async fn get_test_suite_history_by_id(
        &self,
        id: i32,
    ) -> AppResult<Option<test_suite_history::Model>> {
        let result = TestSuiteHistory::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test suite history: {}", e)))?;

        Ok(result)
    }

    /// Close a suite history.
    ///
    /// Same rules as closing a test run: caller-supplied status wins,
    /// otherwise derived from the suite's test executions.
    pub async fn close_test_suite_history(
        &self,
        id: i32,
        end_datetime: NaiveDateTime,
        data: Option<JsonValue>,
        status: Option<RunStatus>,
    ) -> AppResult<Option<test_suite_history::Model>> {
        let Some(history) = TestSuiteHistory::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test suite history: {}", e)))?
        else {
            return Ok(None);
        };

        let status = match status {
            Some(status) => status,
            None => RunStatus::from_failed_count(
                self.count_failed_tests(TallyParent::TestSuiteHistory, id)
                    .await?,
            ),
        };

        let mut active: HistoryActiveModel = history.into();
        active.end_datetime = Set(Some(end_datetime));
        active.test_suite_status_id = Set(status.id());
        if data.is_some() {
            active.data = Set(data);
        }

        let result = active.update(self.connection()).await.map_err(|e| {
            AppError::Database(format!("Failed to close test suite history: {}", e))
        })?;

        Ok(Some(result))
    }

    /// Suite histories of a test run with their suites, optionally filtered by status id.
    pub async fn get_test_suite_histories_by_test_run(
        &self,
        test_run_id: i32,
        test_suite_status_id: Option<i32>,
    ) -> AppResult<Vec<(test_suite_history::Model, test_suite::Model)>> {
        let mut select = TestSuiteHistory::find()
            .find_also_related(TestSuite)
            .filter(test_suite_history::Column::TestRunId.eq(test_run_id));

        if let Some(status_id) = test_suite_status_id {
            select = select.filter(test_suite_history::Column::TestSuiteStatusId.eq(status_id));
        }

        let rows = select
            .order_by_asc(test_suite_history::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to get test suite histories: {}", e))
            })?;

        Ok(rows
            .into_iter()
            .filter_map(|(history, suite)| suite.map(|suite| (history, suite)))
            .collect())
    }
}
