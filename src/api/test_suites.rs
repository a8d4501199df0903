//! Test suite and test suite history endpoints.

use actix_web::{HttpResponse, web};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::info;
use utoipa::ToSchema;

use crate::db::{DbPool, NewTestSuiteHistory};
use crate::entity::{test_suite, test_suite_history};
use crate::error::{AppError, AppResult};
use crate::models::timestamp::deserialize_optional;
use crate::models::{
    CalendarDelta, MessageResponse, RunStatus, StatusLookup, StatusRef, require, require_text,
};

/// Request body for registering a test suite.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestSuiteRequest {
    pub project: Option<String>,
    pub name: Option<String>,
    pub test_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateTestSuiteResponse {
    pub message: String,
    pub test_suite_id: i32,
}

/// Request body for starting a suite within a test run.
///
/// The suite itself is found or created from `project`, `name` and `test_type`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestSuiteHistoryRequest {
    pub project: Option<String>,
    pub name: Option<String>,
    pub test_type: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub start_datetime: Option<NaiveDateTime>,
    pub test_run_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateTestSuiteHistoryResponse {
    pub message: String,
    pub test_suite_history_id: i32,
    pub test_suite_id: i32,
}

/// Request body for closing a suite history.
///
/// Without `test_suite_status` the status is derived from the suite's tests.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTestSuiteHistoryRequest {
    pub test_suite_history_id: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub end_datetime: Option<NaiveDateTime>,
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
    pub test_suite_status: Option<StatusRef>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TestSuiteResponse {
    pub test_suite_id: i32,
    pub name: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
    pub test_type: Option<String>,
}

/// One execution of a suite within a test run.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestSuiteHistoryResponse {
    pub test_suite_history_id: i32,
    pub test_suite_id: i32,
    pub name: String,
    pub start_datetime: NaiveDateTime,
    pub end_datetime: Option<NaiveDateTime>,
    pub duration: Option<CalendarDelta>,
    pub test_suite_status: String,
}

impl From<(test_suite_history::Model, test_suite::Model)> for TestSuiteHistoryResponse {
    fn from((history, suite): (test_suite_history::Model, test_suite::Model)) -> Self {
        TestSuiteHistoryResponse {
            test_suite_history_id: history.id,
            test_suite_id: suite.id,
            name: suite.name,
            start_datetime: history.start_datetime,
            end_datetime: history.end_datetime,
            duration: CalendarDelta::elapsed(Some(history.start_datetime), history.end_datetime),
            test_suite_status: RunStatus::name_of(history.test_suite_status_id).to_string(),
        }
    }
}

/// Register a test suite, or return the one already known for this project and test type.
#[utoipa::path(
    post,
    path = "/api/v1/test_suite",
    tag = "Test Suites",
    request_body = CreateTestSuiteRequest,
    responses(
        (status = 200, description = "Test suite created or already present", body = CreateTestSuiteResponse),
        (status = 400, description = "Missing project or name", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_test_suite(
    pool: web::Data<DbPool>,
    body: web::Json<CreateTestSuiteRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let project_name = require_text(body.project, "project")?;
    let name = require_text(body.name, "name")?;
    info!("Create test suite '{}' for project '{}'", name, project_name);

    let project = pool.find_or_create_project(&project_name).await?.into_inner();
    let result = pool
        .find_or_create_test_suite(&name, project.id, body.test_type.as_deref())
        .await?;

    let message = if result.was_created() {
        "New test suite added successfully"
    } else {
        "Test suite is already present"
    };

    Ok(HttpResponse::Ok().json(CreateTestSuiteResponse {
        message: message.to_string(),
        test_suite_id: result.get().id,
    }))
}

/// Get a test suite by ID.
#[utoipa::path(
    get,
    path = "/api/v1/test_suite/{test_suite_id}",
    tag = "Test Suites",
    params(("test_suite_id" = i32, Path, description = "Test suite ID")),
    responses(
        (status = 200, description = "Test suite, or a message when not found", body = TestSuiteResponse)
    )
)]
pub async fn get_test_suite(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let test_suite_id = path.into_inner();
    info!("Get test suite {}", test_suite_id);

    match pool.get_test_suite_by_id(test_suite_id).await? {
        Some(suite) => Ok(HttpResponse::Ok().json(TestSuiteResponse {
            test_suite_id: suite.id,
            name: suite.name,
            data: suite.data,
            test_type: suite.test_type,
        })),
        None => Ok(HttpResponse::Ok().json(MessageResponse::new(
            "No test suite with the id provided was found",
        ))),
    }
}

/// Start a suite within a test run, registering the suite if needed.
#[utoipa::path(
    post,
    path = "/api/v1/test_suite_history",
    tag = "Test Suites",
    request_body = CreateTestSuiteHistoryRequest,
    responses(
        (status = 200, description = "Suite history created", body = CreateTestSuiteHistoryResponse),
        (status = 400, description = "Missing field or unknown test run", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_test_suite_history(
    pool: web::Data<DbPool>,
    body: web::Json<CreateTestSuiteHistoryRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let project_name = require_text(body.project, "project")?;
    let name = require_text(body.name, "name")?;
    let start_datetime = require(body.start_datetime, "start_datetime")?;
    let test_run_id = require(body.test_run_id, "test_run_id")?;
    info!("Start test suite '{}' in test run {}", name, test_run_id);

    if pool.get_test_run_by_id(test_run_id).await?.is_none() {
        return Err(AppError::InvalidInput(format!(
            "Test run {} does not exist",
            test_run_id
        )));
    }

    let project = pool.find_or_create_project(&project_name).await?.into_inner();
    let suite = pool
        .find_or_create_test_suite(&name, project.id, body.test_type.as_deref())
        .await?
        .into_inner();

    let history = pool
        .insert_test_suite_history(NewTestSuiteHistory {
            data: body.data,
            start_datetime,
            test_run_id,
            test_suite_id: suite.id,
        })
        .await?;

    Ok(HttpResponse::Ok().json(CreateTestSuiteHistoryResponse {
        message: "New test suite history added successfully".to_string(),
        test_suite_history_id: history.id,
        test_suite_id: suite.id,
    }))
}

/// Close a suite history.
#[utoipa::path(
    put,
    path = "/api/v1/test_suite_history",
    tag = "Test Suites",
    request_body = UpdateTestSuiteHistoryRequest,
    responses(
        (status = 200, description = "Suite history closed, or a message when not found", body = MessageResponse),
        (status = 400, description = "Missing id or unknown status", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_test_suite_history(
    pool: web::Data<DbPool>,
    body: web::Json<UpdateTestSuiteHistoryRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let history_id = require(body.test_suite_history_id, "test_suite_history_id")?;
    let status = body
        .test_suite_status
        .as_ref()
        .map(StatusRef::resolve::<RunStatus>)
        .transpose()?;
    let end_datetime = body.end_datetime.unwrap_or_else(|| Utc::now().naive_utc());
    info!("Close test suite history {}", history_id);

    let message = match pool
        .close_test_suite_history(history_id, end_datetime, body.data, status)
        .await?
    {
        Some(_) => "Test suite history updated successfully",
        None => "No test suite history with the id provided was found",
    };

    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}

fn suite_histories_response(
    rows: Vec<(test_suite_history::Model, test_suite::Model)>,
) -> HttpResponse {
    if rows.is_empty() {
        return HttpResponse::Ok().json(MessageResponse::new("No tests suites were found"));
    }

    let response: Vec<TestSuiteHistoryResponse> = rows.into_iter().map(Into::into).collect();
    HttpResponse::Ok().json(response)
}

/// List the suite histories of a test run.
#[utoipa::path(
    get,
    path = "/api/v1/tests_suite_history/test_run/{test_run_id}",
    tag = "Test Suites",
    params(("test_run_id" = i32, Path, description = "Test run ID")),
    responses(
        (status = 200, description = "Suite histories, or a message when there are none", body = Vec<TestSuiteHistoryResponse>)
    )
)]
pub async fn get_suite_histories_by_test_run(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let test_run_id = path.into_inner();
    info!("Get suite histories for test run {}", test_run_id);

    let rows = pool
        .get_test_suite_histories_by_test_run(test_run_id, None)
        .await?;
    Ok(suite_histories_response(rows))
}

/// List the suite histories of a test run in one status.
#[utoipa::path(
    get,
    path = "/api/v1/tests_suite_history/test_status/{test_suite_status_id}/test_run/{test_run_id}",
    tag = "Test Suites",
    params(
        ("test_suite_status_id" = i32, Path, description = "Suite status ID (1 Running, 2 Successful, 3 Failed)"),
        ("test_run_id" = i32, Path, description = "Test run ID")
    ),
    responses(
        (status = 200, description = "Suite histories, or a message when there are none", body = Vec<TestSuiteHistoryResponse>)
    )
)]
pub async fn get_suite_histories_by_status_and_test_run(
    pool: web::Data<DbPool>,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    let (status_id, test_run_id) = path.into_inner();
    info!(
        "Get suite histories in status {} for test run {}",
        status_id, test_run_id
    );

    let rows = pool
        .get_test_suite_histories_by_test_run(test_run_id, Some(status_id))
        .await?;
    Ok(suite_histories_response(rows))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/test_suite").route(web::post().to(create_test_suite)))
        .service(
            web::resource(r"/test_suite/{test_suite_id:\d+}").route(web::get().to(get_test_suite)),
        )
        .service(
            web::resource("/test_suite_history")
                .route(web::post().to(create_test_suite_history))
                .route(web::put().to(update_test_suite_history)),
        )
        .service(
            web::resource(r"/tests_suite_history/test_run/{test_run_id:\d+}")
                .route(web::get().to(get_suite_histories_by_test_run)),
        )
        .service(
            web::resource(
                r"/tests_suite_history/test_status/{test_suite_status_id:\d+}/test_run/{test_run_id:\d+}",
            )
            .route(web::get().to(get_suite_histories_by_status_and_test_run)),
        );
}
