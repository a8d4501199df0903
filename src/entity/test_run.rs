//! TestRun entity for SeaORM.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_run")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Json", nullable)]
    pub data: Option<JsonValue>,
    pub start_datetime: DateTime,
    /// Null while the run is still in progress.
    pub end_datetime: Option<DateTime>,
    pub test_type: Option<String>,
    pub launch_id: i32,
    pub test_run_status_id: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::launch::Entity",
        from = "Column::LaunchId",
        to = "super::launch::Column::Id"
    )]
    Launch,
    #[sea_orm(has_many = "super::test_suite_history::Entity")]
    TestSuiteHistories,
    #[sea_orm(has_many = "super::test_history::Entity")]
    TestHistories,
}

impl Related<super::launch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Launch.def()
    }
}

impl Related<super::test_suite_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestSuiteHistories.def()
    }
}

impl Related<super::test_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestHistories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
