//! Grouped status counts over test executions.
//!
//! One aggregate row per parent (test run or test suite history). Parents
//! without any test executions are absent from the grouped result and are
//! reported as all-zero tallies by the callers.

use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QuerySelect,
};

use crate::entity::test_history::{self, Entity as TestHistory};
use crate::error::{AppError, AppResult};
use crate::models::StatusTally;
use crate::models::status::{StatusLookup, TestStatus};

use super::DbPool;

/// Parent a set of test executions is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyParent {
    TestRun,
    TestSuiteHistory,
}

impl TallyParent {
    fn column(&self) -> test_history::Column {
        match self {
            Self::TestRun => test_history::Column::TestRunId,
            Self::TestSuiteHistory => test_history::Column::TestSuiteHistoryId,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct TallyRow {
    parent_id: i32,
    tests_total: i64,
    tests_failed: i64,
    tests_passed: i64,
    tests_running: i64,
    tests_incomplete: i64,
    tests_skipped: i64,
}

impl From<TallyRow> for StatusTally {
    fn from(row: TallyRow) -> Self {
        StatusTally {
            tests_total: row.tests_total,
            tests_failed: row.tests_failed,
            tests_passed: row.tests_passed,
            tests_running: row.tests_running,
            tests_incomplete: row.tests_incomplete,
            tests_skipped: row.tests_skipped,
        }
    }
}

/// `SUM(CASE ...)` counting rows in one status. Ids come from the enum, never from input.
fn count_in_status(status: TestStatus) -> String {
    format!(
        "SUM(CASE WHEN test_status_id = {} THEN 1 ELSE 0 END)",
        status.id()
    )
}

impl DbPool {
    /// Status tallies of test executions for each parent id.
    pub async fn tally_tests(
        &self,
        parent: TallyParent,
        parent_ids: &[i32],
    ) -> AppResult<HashMap<i32, StatusTally>> {
        if parent_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let column = parent.column();

        let rows = TestHistory::find()
            .select_only()
            .column_as(column, "parent_id")
            .column_as(Expr::cust("COUNT(*)"), "tests_total")
            .column_as(Expr::cust(count_in_status(TestStatus::Failed)), "tests_failed")
            .column_as(Expr::cust(count_in_status(TestStatus::Passed)), "tests_passed")
            .column_as(Expr::cust(count_in_status(TestStatus::Running)), "tests_running")
            .column_as(
                Expr::cust(count_in_status(TestStatus::Incomplete)),
                "tests_incomplete",
            )
            .column_as(Expr::cust(count_in_status(TestStatus::Skipped)), "tests_skipped")
            .filter(column.is_in(parent_ids.to_vec()))
            .group_by(column)
            .into_model::<TallyRow>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to tally test statuses: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| (row.parent_id, StatusTally::from(row)))
            .collect())
    }

    /// Tally for a single parent; zero when it has no test executions.
    pub async fn tally_tests_for(&self, parent: TallyParent, parent_id: i32) -> AppResult<StatusTally> {
        let mut tallies = self.tally_tests(parent, &[parent_id]).await?;
        Ok(tallies.remove(&parent_id).unwrap_or_default())
    }

    /// Number of failed test executions under a parent.
    pub async fn count_failed_tests(&self, parent: TallyParent, parent_id: i32) -> AppResult<u64> {
        let count = TestHistory::find()
            .filter(parent.column().eq(parent_id))
            .filter(test_history::Column::TestStatusId.eq(TestStatus::Failed.id()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count failed tests: {}", e)))?;

        Ok(count)
    }
}
