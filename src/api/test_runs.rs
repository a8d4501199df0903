//! Test run endpoints.

use actix_web::{HttpResponse, web};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::info;
use utoipa::ToSchema;

use crate::db::{DbPool, NewTestRun};
use crate::error::{AppError, AppResult};
use crate::models::timestamp::deserialize_optional;
use crate::models::{
    CalendarDelta, IdResponse, MessageResponse, RunStatus, StatusLookup, StatusRef, StatusTally,
    require,
};

const TEST_RUN_NOT_FOUND: &str = "No test run with the id provided was found";

/// Request body for starting a test run.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestRunRequest {
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub start_datetime: Option<NaiveDateTime>,
    pub test_type: Option<String>,
    pub launch_id: Option<i32>,
}

/// Request body for closing a test run.
///
/// Without `test_run_status` the status is derived from the run's tests.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTestRunRequest {
    pub test_run_id: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub end_datetime: Option<NaiveDateTime>,
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
    pub test_run_status: Option<StatusRef>,
}

/// A test run with its duration.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestRunResponse {
    pub test_run_id: i32,
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
    pub start_datetime: NaiveDateTime,
    pub end_datetime: Option<NaiveDateTime>,
    pub duration: Option<CalendarDelta>,
    pub test_type: Option<String>,
    pub test_run_status: String,
    pub launch: String,
}

/// A test run of a launch with test status counts.
#[derive(Debug, Serialize, ToSchema)]
pub struct LaunchTestRunResponse {
    pub test_run_id: i32,
    pub launch_id: i32,
    pub project_id: i32,
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
    pub start_datetime: NaiveDateTime,
    pub end_datetime: Option<NaiveDateTime>,
    pub duration: Option<CalendarDelta>,
    pub test_type: Option<String>,
    pub test_run_status: String,
    pub launch_name: String,
    pub launch_status: String,
    #[serde(flatten)]
    pub tally: StatusTally,
}

/// Start a test run under an existing launch.
#[utoipa::path(
    post,
    path = "/api/v1/test_run",
    tag = "Test Runs",
    request_body = CreateTestRunRequest,
    responses(
        (status = 200, description = "Test run created", body = IdResponse),
        (status = 400, description = "Missing field or unknown launch", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_test_run(
    pool: web::Data<DbPool>,
    body: web::Json<CreateTestRunRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let launch_id = require(body.launch_id, "launch_id")?;
    let start_datetime = require(body.start_datetime, "start_datetime")?;
    info!("Create test run for launch {}", launch_id);

    if pool.get_launch_by_id(launch_id).await?.is_none() {
        return Err(AppError::InvalidInput(format!(
            "Launch {} does not exist",
            launch_id
        )));
    }

    let run = pool
        .insert_test_run(NewTestRun {
            data: body.data,
            start_datetime,
            test_type: body.test_type,
            launch_id,
        })
        .await?;

    Ok(HttpResponse::Ok().json(IdResponse::new("New test run added successfully", run.id)))
}

/// Close a test run.
#[utoipa::path(
    put,
    path = "/api/v1/test_run",
    tag = "Test Runs",
    request_body = UpdateTestRunRequest,
    responses(
        (status = 200, description = "Test run closed, or a message when not found", body = IdResponse),
        (status = 400, description = "Missing test_run_id or unknown status", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_test_run(
    pool: web::Data<DbPool>,
    body: web::Json<UpdateTestRunRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let test_run_id = require(body.test_run_id, "test_run_id")?;
    let status = body
        .test_run_status
        .as_ref()
        .map(StatusRef::resolve::<RunStatus>)
        .transpose()?;
    let end_datetime = body.end_datetime.unwrap_or_else(|| Utc::now().naive_utc());
    info!("Close test run {}", test_run_id);

    match pool
        .close_test_run(test_run_id, end_datetime, body.data, status)
        .await?
    {
        Some(run) => Ok(HttpResponse::Ok().json(IdResponse::new(
            "Test run updated successfully",
            run.id,
        ))),
        None => Ok(HttpResponse::Ok().json(MessageResponse::new(TEST_RUN_NOT_FOUND))),
    }
}

/// Get a test run by ID.
#[utoipa::path(
    get,
    path = "/api/v1/test_run/{test_run_id}",
    tag = "Test Runs",
    params(("test_run_id" = i32, Path, description = "Test run ID")),
    responses(
        (status = 200, description = "Test run, or a message when not found", body = TestRunResponse)
    )
)]
pub async fn get_test_run(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let test_run_id = path.into_inner();
    info!("Get test run {}", test_run_id);

    match pool.get_test_run_by_id(test_run_id).await? {
        Some((run, launch)) => Ok(HttpResponse::Ok().json(TestRunResponse {
            test_run_id: run.id,
            data: run.data,
            start_datetime: run.start_datetime,
            end_datetime: run.end_datetime,
            duration: CalendarDelta::elapsed(Some(run.start_datetime), run.end_datetime),
            test_type: run.test_type,
            test_run_status: RunStatus::name_of(run.test_run_status_id).to_string(),
            launch: launch.map(|l| l.name).unwrap_or_default(),
        })),
        None => Ok(HttpResponse::Ok().json(MessageResponse::new(TEST_RUN_NOT_FOUND))),
    }
}

/// List the test runs of a launch with test status counts.
#[utoipa::path(
    get,
    path = "/api/v1/test_run/launch/{launch_id}",
    tag = "Test Runs",
    params(("launch_id" = i32, Path, description = "Launch ID")),
    responses(
        (status = 200, description = "Test runs, or a message when there are none", body = Vec<LaunchTestRunResponse>)
    )
)]
pub async fn get_test_runs_by_launch(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let launch_id = path.into_inner();
    info!("Get test runs for launch {}", launch_id);

    let runs = match pool.get_launch_by_id(launch_id).await? {
        Some((launch, _)) => {
            let runs = pool.get_test_runs_by_launch_id(launch_id).await?;
            runs.into_iter()
                .map(|(run, tally)| LaunchTestRunResponse {
                    test_run_id: run.id,
                    launch_id: launch.id,
                    project_id: launch.project_id,
                    data: run.data,
                    start_datetime: run.start_datetime,
                    end_datetime: run.end_datetime,
                    duration: CalendarDelta::elapsed(Some(run.start_datetime), run.end_datetime),
                    test_type: run.test_type,
                    test_run_status: RunStatus::name_of(run.test_run_status_id).to_string(),
                    launch_name: launch.name.clone(),
                    launch_status: RunStatus::name_of(launch.launch_status_id).to_string(),
                    tally,
                })
                .collect::<Vec<_>>()
        }
        None => Vec::new(),
    };

    if runs.is_empty() {
        return Ok(HttpResponse::Ok().json(MessageResponse::new(
            "No launch with the launch id provided was found",
        )));
    }

    Ok(HttpResponse::Ok().json(runs))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/test_run")
            .route(web::post().to(create_test_run))
            .route(web::put().to(update_test_run)),
    )
    .service(web::resource(r"/test_run/{test_run_id:\d+}").route(web::get().to(get_test_run)))
    .service(
        web::resource(r"/test_run/launch/{launch_id:\d+}").route(web::get().to(get_test_runs_by_launch)),
    );
}
