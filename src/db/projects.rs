//! Database queries for projects.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::project::{self, ActiveModel, Entity as Project};
use crate::error::{AppError, AppResult};
use crate::models::status::{ProjectStatus, StatusLookup};

use super::{DbPool, FindOrCreate};

impl DbPool {
    /// Find the oldest project with the given name.
    pub async fn find_project_by_name(&self, name: &str) -> AppResult<Option<project::Model>> {
        let result = Project::find()
            .filter(project::Column::Name.eq(name))
            .order_by_asc(project::Column::Id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find project: {}", e)))?;

        Ok(result)
    }

    /// Insert a new project in Created status.
    pub async fn insert_project(&self, name: &str) -> AppResult<project::Model> {
        let model = ActiveModel {
            name: Set(name.to_string()),
            data: Set(None),
            project_status_id: Set(ProjectStatus::Created.id()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert project: {}", e)))?;

        Ok(result)
    }

    /// Return the project with this name, creating it if needed.
    pub async fn find_or_create_project(
        &self,
        name: &str,
    ) -> AppResult<FindOrCreate<project::Model>> {
        if let Some(existing) = self.find_project_by_name(name).await? {
            return Ok(FindOrCreate::Found(existing));
        }

        Ok(FindOrCreate::Created(self.insert_project(name).await?))
    }

    /// List all projects.
    pub async fn list_projects(&self) -> AppResult<Vec<project::Model>> {
        let result = Project::find()
            .order_by_asc(project::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list projects: {}", e)))?;

        Ok(result)
    }

    /// Get a project by ID.
    pub async fn get_project_by_id(&self, id: i32) -> AppResult<Option<project::Model>> {
        let result = Project::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get project: {}", e)))?;

        Ok(result)
    }
}
