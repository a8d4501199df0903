//! Launch endpoints.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::info;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::db::launches::LaunchWithRuns;
use crate::entity::test_run;
use crate::error::AppResult;
use crate::models::{
    IdResponse, MessageResponse, RunStatus, StatusLookup, StatusTally, require, require_text,
};

const LAUNCH_NOT_FOUND: &str = "No launch with the id provided was found";

/// Request body for creating a launch. The project is found or created by name.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLaunchRequest {
    pub project: Option<String>,
    pub name: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
}

/// Request body for closing a launch.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FinishLaunchRequest {
    pub launch_id: Option<i32>,
}

/// A launch with its project name.
#[derive(Debug, Serialize, ToSchema)]
pub struct LaunchResponse {
    pub launch_id: i32,
    pub name: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
    pub project: String,
    pub launch_status: String,
}

/// Test status counts for one test run of a launch.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestRunStats {
    pub test_run_id: i32,
    pub test_type: Option<String>,
    #[serde(flatten)]
    pub tally: StatusTally,
}

impl From<(test_run::Model, StatusTally)> for TestRunStats {
    fn from((run, tally): (test_run::Model, StatusTally)) -> Self {
        TestRunStats {
            test_run_id: run.id,
            test_type: run.test_type,
            tally,
        }
    }
}

/// A launch of a project with per-test-run statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectLaunchResponse {
    pub launch_id: i32,
    pub project_id: i32,
    pub name: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
    pub project: String,
    pub launch_status: String,
    pub test_run_stats: Vec<TestRunStats>,
}

/// Create a launch, finding or creating its project by name.
#[utoipa::path(
    post,
    path = "/api/v1/launch",
    tag = "Launches",
    request_body = CreateLaunchRequest,
    responses(
        (status = 200, description = "Launch created", body = IdResponse),
        (status = 400, description = "Missing project or name", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_launch(
    pool: web::Data<DbPool>,
    body: web::Json<CreateLaunchRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let project_name = require_text(body.project, "project")?;
    let name = require_text(body.name, "name")?;
    info!("Create launch '{}' for project '{}'", name, project_name);

    let project = pool.find_or_create_project(&project_name).await?.into_inner();
    let launch = pool.insert_launch(&name, body.data, project.id).await?;

    Ok(HttpResponse::Ok().json(IdResponse::new("New launch added successfully", launch.id)))
}

/// Close a launch. Its status becomes Failed if any of its test runs failed.
#[utoipa::path(
    put,
    path = "/api/v1/finish_launch",
    tag = "Launches",
    request_body = FinishLaunchRequest,
    responses(
        (status = 200, description = "Launch closed, or a message when not found", body = IdResponse),
        (status = 400, description = "Missing launch_id", body = crate::error::ErrorResponse)
    )
)]
pub async fn finish_launch(
    pool: web::Data<DbPool>,
    body: web::Json<FinishLaunchRequest>,
) -> AppResult<HttpResponse> {
    let launch_id = require(body.into_inner().launch_id, "launch_id")?;
    info!("Finish launch {}", launch_id);

    match pool.finish_launch(launch_id).await? {
        Some(launch) => {
            info!(
                "Launch {} finished as {}",
                launch.id,
                RunStatus::name_of(launch.launch_status_id)
            );
            Ok(HttpResponse::Ok().json(IdResponse::new("Launch updated successfully", launch.id)))
        }
        None => Ok(HttpResponse::Ok().json(MessageResponse::new(LAUNCH_NOT_FOUND))),
    }
}

/// Get a launch by ID.
#[utoipa::path(
    get,
    path = "/api/v1/launch/{launch_id}",
    tag = "Launches",
    params(("launch_id" = i32, Path, description = "Launch ID")),
    responses(
        (status = 200, description = "Launch, or a message when not found", body = LaunchResponse)
    )
)]
pub async fn get_launch(pool: web::Data<DbPool>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let launch_id = path.into_inner();
    info!("Get launch {}", launch_id);

    match pool.get_launch_by_id(launch_id).await? {
        Some((launch, project)) => Ok(HttpResponse::Ok().json(LaunchResponse {
            launch_id: launch.id,
            name: launch.name,
            data: launch.data,
            project: project.map(|p| p.name).unwrap_or_default(),
            launch_status: RunStatus::name_of(launch.launch_status_id).to_string(),
        })),
        None => Ok(HttpResponse::Ok().json(MessageResponse::new(LAUNCH_NOT_FOUND))),
    }
}

/// List a project's launches with test status counts for each test run.
#[utoipa::path(
    get,
    path = "/api/v1/launch/project/{project_id}",
    tag = "Launches",
    params(("project_id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Launches, or a message when there are none", body = Vec<ProjectLaunchResponse>)
    )
)]
pub async fn get_launches_by_project(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let project_id = path.into_inner();
    info!("Get launches for project {}", project_id);

    let launches = pool.get_launches_by_project_id(project_id).await?;
    let project = pool.get_project_by_id(project_id).await?;

    let Some(project) = project.filter(|_| !launches.is_empty()) else {
        return Ok(HttpResponse::Ok().json(MessageResponse::new(
            "No launch with the project id provided was found",
        )));
    };

    let response: Vec<ProjectLaunchResponse> = launches
        .into_iter()
        .map(|LaunchWithRuns { launch, test_runs }| ProjectLaunchResponse {
            launch_id: launch.id,
            project_id: launch.project_id,
            name: launch.name,
            data: launch.data,
            project: project.name.clone(),
            launch_status: RunStatus::name_of(launch.launch_status_id).to_string(),
            test_run_stats: test_runs.into_iter().map(Into::into).collect(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/launch").route(web::post().to(create_launch)))
        .service(web::resource("/finish_launch").route(web::put().to(finish_launch)))
        .service(web::resource(r"/launch/{launch_id:\d+}").route(web::get().to(get_launch)))
        .service(
            web::resource(r"/launch/project/{project_id:\d+}")
                .route(web::get().to(get_launches_by_project)),
        );
}
