//! Database queries for tests and their executions (test histories).

use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::launch::{self, Entity as Launch};
use crate::entity::test::{self, ActiveModel as TestActiveModel, Entity as Test};
use crate::entity::test_history::{self, ActiveModel as HistoryActiveModel, Entity as TestHistory};
use crate::entity::test_run::{self, Entity as TestRun};
use crate::entity::test_suite::{self, Entity as TestSuite};
use crate::entity::test_suite_history::{self, Entity as TestSuiteHistory};
use crate::error::{AppError, AppResult};
use crate::models::StatusTally;
use crate::models::status::{StatusLookup, TestResolution, TestStatus};

use super::{DbPool, FindOrCreate, TallyParent};

/// Represents a test execution to be inserted.
#[derive(Debug, Clone)]
pub struct NewTestHistory {
    pub start_datetime: NaiveDateTime,
    pub test_id: i32,
    pub test_run_id: i32,
    pub test_suite_history_id: i32,
}

/// Final result of a test execution.
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub end_datetime: NaiveDateTime,
    pub trace: Option<String>,
    pub file: Option<String>,
    pub message: Option<String>,
    pub error_type: Option<String>,
    pub retries: Option<i32>,
    pub status: TestStatus,
}

/// Optional filters for listing test executions. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestHistoryFilter {
    pub test_status_id: Option<i32>,
    pub test_resolution_id: Option<i32>,
    pub test_run_id: Option<i32>,
}

/// One suite history of a run with its tally and executed tests.
#[derive(Debug, Clone)]
pub struct SuiteBreakdown {
    pub history: test_suite_history::Model,
    pub suite: test_suite::Model,
    pub tally: StatusTally,
    pub tests: Vec<(test_history::Model, test::Model)>,
}

/// A test run broken down into suite histories and test executions.
#[derive(Debug, Clone)]
pub struct TestRunBreakdown {
    pub test_run: test_run::Model,
    pub launch: launch::Model,
    pub tally: StatusTally,
    pub suites: Vec<SuiteBreakdown>,
}

impl DbPool {
    /// Find a test by name. Names are global, not scoped to a suite.
    pub async fn find_test_by_name(&self, name: &str) -> AppResult<Option<test::Model>> {
        let result = Test::find()
            .filter(test::Column::Name.eq(name))
            .order_by_asc(test::Column::Id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find test: {}", e)))?;

        Ok(result)
    }

    /// Insert a new test under a suite.
    pub async fn insert_test(&self, name: &str, test_suite_id: i32) -> AppResult<test::Model> {
        let model = TestActiveModel {
            name: Set(name.to_string()),
            data: Set(None),
            test_suite_id: Set(test_suite_id),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test: {}", e)))?;

        Ok(result)
    }

    pub async fn find_or_create_test(
        &self,
        name: &str,
        test_suite_id: i32,
    ) -> AppResult<FindOrCreate<test::Model>> {
        if let Some(existing) = self.find_test_by_name(name).await? {
            return Ok(FindOrCreate::Found(existing));
        }

        let created = self.insert_test(name, test_suite_id).await?;
        Ok(FindOrCreate::Created(created))
    }

    pub async fn get_test_by_id(&self, id: i32) -> AppResult<Option<test::Model>> {
        let result = Test::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test: {}", e)))?;

        Ok(result)
    }

    /// Insert a test execution in Running status with resolution Unresolved.
    pub async fn insert_test_history(
        &self,
        history: NewTestHistory,
    ) -> AppResult<test_history::Model> {
        let model = HistoryActiveModel {
            start_datetime: Set(history.start_datetime),
            end_datetime: Set(None),
            trace: Set(None),
            file: Set(None),
            message: Set(None),
            error_type: Set(None),
            retries: Set(None),
            test_id: Set(history.test_id),
            test_run_id: Set(history.test_run_id),
            test_suite_history_id: Set(history.test_suite_history_id),
            test_status_id: Set(TestStatus::Running.id()),
            test_resolution_id: Set(TestResolution::Unresolved.id()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test history: {}", e)))?;

        Ok(result)
    }

    async fn find_test_history(&self, id: i32) -> AppResult<Option<test_history::Model>> {
        TestHistory::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test history: {}", e)))
    }

    /// Record the outcome of a test execution. Returns `None` when it does not exist.
    pub async fn close_test_history(
        &self,
        id: i32,
        outcome: TestOutcome,
    ) -> AppResult<Option<test_history::Model>> {
        let Some(history) = self.find_test_history(id).await? else {
            return Ok(None);
        };

        let mut active: HistoryActiveModel = history.into();
        active.end_datetime = Set(Some(outcome.end_datetime));
        active.trace = Set(outcome.trace);
        active.file = Set(outcome.file);
        active.message = Set(outcome.message);
        active.error_type = Set(outcome.error_type);
        active.retries = Set(outcome.retries);
        active.test_status_id = Set(outcome.status.id());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to close test history: {}", e)))?;

        Ok(Some(result))
    }

    /// Set the resolution of a test execution. Returns `None` when it does not exist.
    pub async fn set_test_history_resolution(
        &self,
        id: i32,
        resolution: TestResolution,
    ) -> AppResult<Option<test_history::Model>> {
        let Some(history) = self.find_test_history(id).await? else {
            return Ok(None);
        };

        let mut active: HistoryActiveModel = history.into();
        active.test_resolution_id = Set(resolution.id());

        let result = active.update(self.connection()).await.map_err(|e| {
            AppError::Database(format!("Failed to update test history resolution: {}", e))
        })?;

        Ok(Some(result))
    }

    /// Test executions matching a filter, with their tests, oldest first.
    pub async fn get_test_histories(
        &self,
        filter: TestHistoryFilter,
    ) -> AppResult<Vec<(test_history::Model, test::Model)>> {
        let mut select = TestHistory::find().find_also_related(Test);

        if let Some(status_id) = filter.test_status_id {
            select = select.filter(test_history::Column::TestStatusId.eq(status_id));
        }
        if let Some(resolution_id) = filter.test_resolution_id {
            select = select.filter(test_history::Column::TestResolutionId.eq(resolution_id));
        }
        if let Some(run_id) = filter.test_run_id {
            select = select.filter(test_history::Column::TestRunId.eq(run_id));
        }

        let rows = select
            .order_by_asc(test_history::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test histories: {}", e)))?;

        Ok(rows
            .into_iter()
            .filter_map(|(history, test)| test.map(|test| (history, test)))
            .collect())
    }

    /// Every execution of every test belonging to a suite.
    pub async fn get_test_histories_by_test_suite(
        &self,
        test_suite_id: i32,
    ) -> AppResult<Vec<(test_history::Model, test::Model, test_suite::Model)>> {
        let Some(suite) = self.get_test_suite_by_id(test_suite_id).await? else {
            return Ok(Vec::new());
        };

        let rows = TestHistory::find()
            .find_also_related(Test)
            .filter(test::Column::TestSuiteId.eq(test_suite_id))
            .order_by_asc(test_history::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to get test histories by suite: {}", e))
            })?;

        Ok(rows
            .into_iter()
            .filter_map(|(history, test)| test.map(|test| (history, test, suite.clone())))
            .collect())
    }

    /// Run → suite histories → test executions, each level with its own tally.
    ///
    /// Only suite histories with at least one test execution are listed.
    /// Returns `None` when the run does not exist or has no executions.
    pub async fn get_test_run_breakdown(
        &self,
        test_run_id: i32,
    ) -> AppResult<Option<TestRunBreakdown>> {
        let Some((test_run, Some(launch))) = TestRun::find_by_id(test_run_id)
            .find_also_related(Launch)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test run: {}", e)))?
        else {
            return Ok(None);
        };

        let executions = self
            .get_test_histories(TestHistoryFilter {
                test_run_id: Some(test_run_id),
                ..Default::default()
            })
            .await?;

        if executions.is_empty() {
            return Ok(None);
        }

        let suite_rows = TestSuiteHistory::find()
            .find_also_related(TestSuite)
            .filter(test_suite_history::Column::TestRunId.eq(test_run_id))
            .order_by_asc(test_suite_history::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to get test suite histories: {}", e))
            })?;

        let history_ids: Vec<i32> = suite_rows.iter().map(|(h, _)| h.id).collect();
        let suite_tallies = self
            .tally_tests(TallyParent::TestSuiteHistory, &history_ids)
            .await?;

        let mut tests_by_history: HashMap<i32, Vec<(test_history::Model, test::Model)>> =
            HashMap::new();
        for (history, test) in executions {
            tests_by_history
                .entry(history.test_suite_history_id)
                .or_default()
                .push((history, test));
        }

        let suites = suite_rows
            .into_iter()
            .filter_map(|(history, suite)| {
                let suite = suite?;
                let tests = tests_by_history.remove(&history.id)?;
                let tally = suite_tallies.get(&history.id).copied().unwrap_or_default();
                Some(SuiteBreakdown {
                    history,
                    suite,
                    tally,
                    tests,
                })
            })
            .collect();

        let tally = self
            .tally_tests_for(TallyParent::TestRun, test_run_id)
            .await?;

        Ok(Some(TestRunBreakdown {
            test_run,
            launch,
            tally,
            suites,
        }))
    }
}
