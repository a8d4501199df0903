//! TestHistory entity: one execution of a test with its diagnostics.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "test_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub start_datetime: DateTime,
    pub end_datetime: Option<DateTime>,
    #[sea_orm(column_type = "Text", nullable)]
    pub trace: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub file: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub error_type: Option<String>,
    pub retries: Option<i32>,
    pub test_id: i32,
    pub test_run_id: i32,
    pub test_suite_history_id: i32,
    pub test_status_id: i32,
    pub test_resolution_id: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test::Entity",
        from = "Column::TestId",
        to = "super::test::Column::Id"
    )]
    Test,
    #[sea_orm(
        belongs_to = "super::test_run::Entity",
        from = "Column::TestRunId",
        to = "super::test_run::Column::Id"
    )]
    TestRun,
    #[sea_orm(
        belongs_to = "super::test_suite_history::Entity",
        from = "Column::TestSuiteHistoryId",
        to = "super::test_suite_history::Column::Id"
    )]
    TestSuiteHistory,
}

impl Related<super::test::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Test.def()
    }
}

impl Related<super::test_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestRun.def()
    }
}

impl Related<super::test_suite_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestSuiteHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
