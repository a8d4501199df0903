//! Project endpoints.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::info;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::entity::project;
use crate::error::AppResult;
use crate::models::{IdResponse, MessageResponse, ProjectStatus, StatusLookup, require_text};

/// Request body for creating (or recovering) a project.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub name: Option<String>,
}

/// A project.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub project_id: i32,
    pub name: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
    pub project_status: String,
}

impl From<project::Model> for ProjectResponse {
    fn from(p: project::Model) -> Self {
        ProjectResponse {
            project_id: p.id,
            name: p.name,
            data: p.data,
            project_status: ProjectStatus::name_of(p.project_status_id).to_string(),
        }
    }
}

/// Create a project, or return the existing one with the same name.
#[utoipa::path(
    post,
    path = "/api/v1/project",
    tag = "Projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Project created or recovered", body = IdResponse),
        (status = 400, description = "Missing name", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_project(
    pool: web::Data<DbPool>,
    body: web::Json<CreateProjectRequest>,
) -> AppResult<HttpResponse> {
    let name = require_text(body.into_inner().name, "name")?;
    info!("Create project '{}'", name);

    let result = pool.find_or_create_project(&name).await?;
    let message = if result.was_created() {
        "New project added successfully"
    } else {
        "Project recovered successfully"
    };

    Ok(HttpResponse::Ok().json(IdResponse::new(message, result.get().id)))
}

/// List all projects.
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "Projects, or a message when there are none", body = Vec<ProjectResponse>)
    )
)]
pub async fn list_projects(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let projects = pool.list_projects().await?;

    if projects.is_empty() {
        return Ok(HttpResponse::Ok().json(MessageResponse::new("No projects were found")));
    }

    let response: Vec<ProjectResponse> = projects.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// Get a project by ID.
#[utoipa::path(
    get,
    path = "/api/v1/project/{project_id}",
    tag = "Projects",
    params(("project_id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project, or a message when not found", body = ProjectResponse)
    )
)]
pub async fn get_project(pool: web::Data<DbPool>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let project_id = path.into_inner();
    info!("Get project {}", project_id);

    match pool.get_project_by_id(project_id).await? {
        Some(project) => Ok(HttpResponse::Ok().json(ProjectResponse::from(project))),
        None => Ok(HttpResponse::Ok().json(MessageResponse::new(
            "No project with the id provided was found",
        ))),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/project").route(web::post().to(create_project)))
        .service(web::resource("/projects").route(web::get().to(list_projects)))
        .service(web::resource(r"/project/{project_id:\d+}").route(web::get().to(get_project)));
}
