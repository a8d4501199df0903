//! Test and test history endpoints.

use actix_web::{HttpResponse, web};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::info;
use utoipa::ToSchema;

use crate::db::{
    DbPool, NewTestHistory, SuiteBreakdown, TestHistoryFilter, TestOutcome, TestRunBreakdown,
};
use crate::entity::{test, test_history};
use crate::error::{AppError, AppResult};
use crate::models::timestamp::deserialize_optional;
use crate::models::{
    CalendarDelta, MessageResponse, RunStatus, StatusLookup, StatusRef, StatusTally,
    TestResolution, TestStatus, require, require_text,
};

const NO_TESTS: &str = "No tests were found";

/// Request body for registering a test. Tests are looked up by name only.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestRequest {
    pub name: Option<String>,
    pub test_suite_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateTestResponse {
    pub message: String,
    pub test_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TestResponse {
    pub test_id: i32,
    pub name: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
    pub test_suite_id: i32,
}

/// Request body for starting a test execution, registering the test if needed.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestHistoryRequest {
    pub name: Option<String>,
    pub test_suite_id: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub start_datetime: Option<NaiveDateTime>,
    pub test_run_id: Option<i32>,
    pub test_suite_history_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateTestHistoryResponse {
    pub message: String,
    pub test_history_id: i32,
    pub test_id: i32,
}

/// Request body for recording the outcome of a test execution.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTestHistoryRequest {
    pub test_history_id: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub end_datetime: Option<NaiveDateTime>,
    pub trace: Option<String>,
    pub file: Option<String>,
    pub message: Option<String>,
    pub error_type: Option<String>,
    pub retries: Option<i32>,
    pub test_status: Option<StatusRef>,
}

/// Request body for classifying a test execution.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateResolutionRequest {
    pub test_history_id: Option<i32>,
    pub test_resolution: Option<StatusRef>,
}

/// A test execution with its status and resolution.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestHistoryResponse {
    pub test_history_id: i32,
    pub name: String,
    pub start_datetime: NaiveDateTime,
    pub end_datetime: Option<NaiveDateTime>,
    pub duration: Option<CalendarDelta>,
    pub test_status: String,
    pub test_resolution: String,
}

impl TestHistoryResponse {
    fn new(history: &test_history::Model, test: &test::Model) -> Self {
        TestHistoryResponse {
            test_history_id: history.id,
            name: test.name.clone(),
            start_datetime: history.start_datetime,
            end_datetime: history.end_datetime,
            duration: CalendarDelta::elapsed(Some(history.start_datetime), history.end_datetime),
            test_status: TestStatus::name_of(history.test_status_id).to_string(),
            test_resolution: TestResolution::name_of(history.test_resolution_id).to_string(),
        }
    }
}

/// A test execution with its failure diagnostics.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestHistoryDetailResponse {
    #[serde(flatten)]
    pub history: TestHistoryResponse,
    pub trace: Option<String>,
    pub file: Option<String>,
    pub message: Option<String>,
    pub error_type: Option<String>,
    pub retries: Option<i32>,
}

/// A test execution with the suite its test belongs to.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuiteTestHistoryResponse {
    #[serde(flatten)]
    pub history: TestHistoryResponse,
    pub test_suite: String,
    pub test_type: Option<String>,
}

/// A test execution inside a test run breakdown.
#[derive(Debug, Serialize, ToSchema)]
pub struct BreakdownTestResponse {
    pub test_history_id: i32,
    pub test_id: i32,
    pub name: String,
    pub trace: Option<String>,
    pub file: Option<String>,
    pub message: Option<String>,
    pub error_type: Option<String>,
    pub retries: Option<i32>,
    pub start_datetime: NaiveDateTime,
    pub end_datetime: Option<NaiveDateTime>,
    pub duration: Option<CalendarDelta>,
    pub status: String,
    pub resolution: String,
}

/// A suite history inside a test run breakdown.
#[derive(Debug, Serialize, ToSchema)]
pub struct BreakdownSuiteResponse {
    pub test_suite_history_id: i32,
    pub test_suite_id: i32,
    pub name: String,
    pub start_datetime: NaiveDateTime,
    pub end_datetime: Option<NaiveDateTime>,
    pub duration: Option<CalendarDelta>,
    pub test_suite_status: String,
    #[serde(flatten)]
    pub tally: StatusTally,
    pub tests: Vec<BreakdownTestResponse>,
}

/// A test run broken down into suites and tests.
#[derive(Debug, Serialize, ToSchema)]
pub struct BreakdownResponse {
    pub test_run_id: i32,
    pub launch_id: i32,
    pub project_id: i32,
    pub launch: String,
    pub test_type: Option<String>,
    pub start_datetime: NaiveDateTime,
    pub end_datetime: Option<NaiveDateTime>,
    pub duration: Option<CalendarDelta>,
    pub test_run_status: String,
    #[serde(flatten)]
    pub tally: StatusTally,
    pub test_suites: Vec<BreakdownSuiteResponse>,
}

impl From<(test_history::Model, test::Model)> for BreakdownTestResponse {
    fn from((history, test): (test_history::Model, test::Model)) -> Self {
        BreakdownTestResponse {
            test_history_id: history.id,
            test_id: test.id,
            name: test.name,
            duration: CalendarDelta::elapsed(Some(history.start_datetime), history.end_datetime),
            trace: history.trace,
            file: history.file,
            message: history.message,
            error_type: history.error_type,
            retries: history.retries,
            start_datetime: history.start_datetime,
            end_datetime: history.end_datetime,
            status: TestStatus::name_of(history.test_status_id).to_string(),
            resolution: TestResolution::name_of(history.test_resolution_id).to_string(),
        }
    }
}

impl From<SuiteBreakdown> for BreakdownSuiteResponse {
    fn from(b: SuiteBreakdown) -> Self {
        BreakdownSuiteResponse {
            test_suite_history_id: b.history.id,
            test_suite_id: b.suite.id,
            name: b.suite.name,
            start_datetime: b.history.start_datetime,
            end_datetime: b.history.end_datetime,
            duration: CalendarDelta::elapsed(
                Some(b.history.start_datetime),
                b.history.end_datetime,
            ),
            test_suite_status: RunStatus::name_of(b.history.test_suite_status_id).to_string(),
            tally: b.tally,
            tests: b.tests.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<TestRunBreakdown> for BreakdownResponse {
    fn from(b: TestRunBreakdown) -> Self {
        let run = b.test_run;
        BreakdownResponse {
            test_run_id: run.id,
            launch_id: b.launch.id,
            project_id: b.launch.project_id,
            launch: b.launch.name,
            test_type: run.test_type,
            start_datetime: run.start_datetime,
            end_datetime: run.end_datetime,
            duration: CalendarDelta::elapsed(Some(run.start_datetime), run.end_datetime),
            test_run_status: RunStatus::name_of(run.test_run_status_id).to_string(),
            tally: b.tally,
            test_suites: b.suites.into_iter().map(Into::into).collect(),
        }
    }
}

/// Register a test, or return the existing test with the same name.
#[utoipa::path(
    post,
    path = "/api/v1/test",
    tag = "Tests",
    request_body = CreateTestRequest,
    responses(
        (status = 200, description = "Test created or already present", body = CreateTestResponse),
        (status = 400, description = "Missing field or unknown test suite", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_test(
    pool: web::Data<DbPool>,
    body: web::Json<CreateTestRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let name = require_text(body.name, "name")?;
    let test_suite_id = require(body.test_suite_id, "test_suite_id")?;
    info!("Create test '{}'", name);

    ensure_test_suite_exists(&pool, test_suite_id).await?;

    let result = pool.find_or_create_test(&name, test_suite_id).await?;
    let message = if result.was_created() {
        "New test added successfully"
    } else {
        "Test is already present"
    };

    Ok(HttpResponse::Ok().json(CreateTestResponse {
        message: message.to_string(),
        test_id: result.get().id,
    }))
}

/// Get a test by ID.
#[utoipa::path(
    get,
    path = "/api/v1/test/{test_id}",
    tag = "Tests",
    params(("test_id" = i32, Path, description = "Test ID")),
    responses(
        (status = 200, description = "Test, or a message when not found", body = TestResponse)
    )
)]
pub async fn get_test(pool: web::Data<DbPool>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let test_id = path.into_inner();
    info!("Get test {}", test_id);

    match pool.get_test_by_id(test_id).await? {
        Some(test) => Ok(HttpResponse::Ok().json(TestResponse {
            test_id: test.id,
            name: test.name,
            data: test.data,
            test_suite_id: test.test_suite_id,
        })),
        None => Ok(HttpResponse::Ok().json(MessageResponse::new(
            "No test with the id provided was found",
        ))),
    }
}

async fn ensure_test_suite_exists(pool: &DbPool, test_suite_id: i32) -> AppResult<()> {
    if pool.get_test_suite_by_id(test_suite_id).await?.is_none() {
        return Err(AppError::InvalidInput(format!(
            "Test suite {} does not exist",
            test_suite_id
        )));
    }
    Ok(())
}

/// Start a test execution.
#[utoipa::path(
    post,
    path = "/api/v1/test_history",
    tag = "Tests",
    request_body = CreateTestHistoryRequest,
    responses(
        (status = 200, description = "Test history created", body = CreateTestHistoryResponse),
        (status = 400, description = "Missing field or unknown parent", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_test_history(
    pool: web::Data<DbPool>,
    body: web::Json<CreateTestHistoryRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let name = require_text(body.name, "name")?;
    let test_suite_id = require(body.test_suite_id, "test_suite_id")?;
    let start_datetime = require(body.start_datetime, "start_datetime")?;
    let test_run_id = require(body.test_run_id, "test_run_id")?;
    let test_suite_history_id = require(body.test_suite_history_id, "test_suite_history_id")?;
    info!(
        "Start test '{}' in suite history {}",
        name, test_suite_history_id
    );

    ensure_test_suite_exists(&pool, test_suite_id).await?;
    if pool.get_test_run_by_id(test_run_id).await?.is_none() {
        return Err(AppError::InvalidInput(format!(
            "Test run {} does not exist",
            test_run_id
        )));
    }
    match pool.get_test_suite_history_by_id(test_suite_history_id).await? {
        Some(history) if history.test_run_id == test_run_id => {}
        _ => {
            return Err(AppError::InvalidInput(format!(
                "Test suite history {} does not exist in test run {}",
                test_suite_history_id, test_run_id
            )));
        }
    }

    let test = pool
        .find_or_create_test(&name, test_suite_id)
        .await?
        .into_inner();

    let history = pool
        .insert_test_history(NewTestHistory {
            start_datetime,
            test_id: test.id,
            test_run_id,
            test_suite_history_id,
        })
        .await?;

    Ok(HttpResponse::Ok().json(CreateTestHistoryResponse {
        message: "New test history added successfully".to_string(),
        test_history_id: history.id,
        test_id: test.id,
    }))
}

/// Record the outcome of a test execution.
#[utoipa::path(
    put,
    path = "/api/v1/test_history",
    tag = "Tests",
    request_body = UpdateTestHistoryRequest,
    responses(
        (status = 200, description = "Test history updated, or a message when not found", body = MessageResponse),
        (status = 400, description = "Missing field or unknown status", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_test_history(
    pool: web::Data<DbPool>,
    body: web::Json<UpdateTestHistoryRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let test_history_id = require(body.test_history_id, "test_history_id")?;
    let status = require(body.test_status, "test_status")?.resolve::<TestStatus>()?;
    info!("Close test history {} as {}", test_history_id, status.as_str());

    let outcome = TestOutcome {
        end_datetime: body.end_datetime.unwrap_or_else(|| Utc::now().naive_utc()),
        trace: body.trace,
        file: body.file,
        message: body.message,
        error_type: body.error_type,
        retries: body.retries,
        status,
    };

    let message = match pool.close_test_history(test_history_id, outcome).await? {
        Some(_) => "Test history updated successfully",
        None => "No test history with the id provided was found",
    };

    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}

/// Classify a test execution.
#[utoipa::path(
    put,
    path = "/api/v1/test_history_resolution",
    tag = "Tests",
    request_body = UpdateResolutionRequest,
    responses(
        (status = 200, description = "Resolution updated, or a message when not found", body = MessageResponse),
        (status = 400, description = "Missing field or unknown resolution", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_test_history_resolution(
    pool: web::Data<DbPool>,
    body: web::Json<UpdateResolutionRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let test_history_id = require(body.test_history_id, "test_history_id")?;
    let resolution =
        require(body.test_resolution, "test_resolution")?.resolve::<TestResolution>()?;
    info!(
        "Set resolution of test history {} to {}",
        test_history_id,
        resolution.as_str()
    );

    let message = match pool
        .set_test_history_resolution(test_history_id, resolution)
        .await?
    {
        Some(_) => "Test history resolution updated successfully",
        None => "No test history with the id provided was found",
    };

    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}

/// Break a test run down into suite histories and test executions.
#[utoipa::path(
    get,
    path = "/api/v1/tests_history/test_run/{test_run_id}",
    tag = "Tests",
    params(("test_run_id" = i32, Path, description = "Test run ID")),
    responses(
        (status = 200, description = "Single-element list with the breakdown, or a message when the run has no tests", body = Vec<BreakdownResponse>)
    )
)]
pub async fn get_test_run_breakdown(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let test_run_id = path.into_inner();
    info!("Get test breakdown for test run {}", test_run_id);

    match pool.get_test_run_breakdown(test_run_id).await? {
        Some(breakdown) => Ok(HttpResponse::Ok().json(vec![BreakdownResponse::from(breakdown)])),
        None => Ok(HttpResponse::Ok().json(MessageResponse::new(NO_TESTS))),
    }
}

/// List the test executions of a run in one status, with diagnostics.
#[utoipa::path(
    get,
    path = "/api/v1/tests_history/test_status/{test_status_id}/test_run/{test_run_id}",
    tag = "Tests",
    params(
        ("test_status_id" = i32, Path, description = "Test status ID (1 Running, 2 Passed, 3 Failed, 4 Skipped, 5 Incomplete)"),
        ("test_run_id" = i32, Path, description = "Test run ID")
    ),
    responses(
        (status = 200, description = "Test histories, or a message when there are none", body = Vec<TestHistoryDetailResponse>)
    )
)]
pub async fn get_test_histories_by_status_and_test_run(
    pool: web::Data<DbPool>,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    let (test_status_id, test_run_id) = path.into_inner();
    info!(
        "Get test histories in status {} for test run {}",
        test_status_id, test_run_id
    );

    let rows = pool
        .get_test_histories(TestHistoryFilter {
            test_status_id: Some(test_status_id),
            test_run_id: Some(test_run_id),
            ..Default::default()
        })
        .await?;

    if rows.is_empty() {
        return Ok(HttpResponse::Ok().json(MessageResponse::new(NO_TESTS)));
    }

    let response: Vec<TestHistoryDetailResponse> = rows
        .into_iter()
        .map(|(history, test)| TestHistoryDetailResponse {
            history: TestHistoryResponse::new(&history, &test),
            trace: history.trace,
            file: history.file,
            message: history.message,
            error_type: history.error_type,
            retries: history.retries,
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

async fn filtered_histories(pool: &DbPool, filter: TestHistoryFilter) -> AppResult<HttpResponse> {
    let rows = pool.get_test_histories(filter).await?;

    if rows.is_empty() {
        return Ok(HttpResponse::Ok().json(MessageResponse::new(NO_TESTS)));
    }

    let response: Vec<TestHistoryResponse> = rows
        .iter()
        .map(|(history, test)| TestHistoryResponse::new(history, test))
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// List test executions in one status across all runs.
#[utoipa::path(
    get,
    path = "/api/v1/tests_history/test_status/{test_status_id}",
    tag = "Tests",
    params(("test_status_id" = i32, Path, description = "Test status ID")),
    responses(
        (status = 200, description = "Test histories, or a message when there are none", body = Vec<TestHistoryResponse>)
    )
)]
pub async fn get_test_histories_by_status(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let test_status_id = path.into_inner();
    info!("Get test histories in status {}", test_status_id);

    filtered_histories(
        &pool,
        TestHistoryFilter {
            test_status_id: Some(test_status_id),
            ..Default::default()
        },
    )
    .await
}

/// List test executions with one resolution across all runs.
#[utoipa::path(
    get,
    path = "/api/v1/tests_history/test_resolution/{test_resolution_id}",
    tag = "Tests",
    params(("test_resolution_id" = i32, Path, description = "Test resolution ID")),
    responses(
        (status = 200, description = "Test histories, or a message when there are none", body = Vec<TestHistoryResponse>)
    )
)]
pub async fn get_test_histories_by_resolution(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let test_resolution_id = path.into_inner();
    info!("Get test histories with resolution {}", test_resolution_id);

    filtered_histories(
        &pool,
        TestHistoryFilter {
            test_resolution_id: Some(test_resolution_id),
            ..Default::default()
        },
    )
    .await
}

/// List every execution of the tests in a suite.
#[utoipa::path(
    get,
    path = "/api/v1/tests_history/test_suite/{test_suite_id}",
    tag = "Tests",
    params(("test_suite_id" = i32, Path, description = "Test suite ID")),
    responses(
        (status = 200, description = "Test histories, or a message when there are none", body = Vec<SuiteTestHistoryResponse>)
    )
)]
pub async fn get_test_histories_by_suite(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let test_suite_id = path.into_inner();
    info!("Get test histories for test suite {}", test_suite_id);

    let rows = pool.get_test_histories_by_test_suite(test_suite_id).await?;

    if rows.is_empty() {
        return Ok(HttpResponse::Ok().json(MessageResponse::new(NO_TESTS)));
    }

    let response: Vec<SuiteTestHistoryResponse> = rows
        .into_iter()
        .map(|(history, test, suite)| SuiteTestHistoryResponse {
            history: TestHistoryResponse::new(&history, &test),
            test_suite: suite.name,
            test_type: suite.test_type,
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/test").route(web::post().to(create_test)))
        .service(web::resource(r"/test/{test_id:\d+}").route(web::get().to(get_test)))
        .service(
            web::resource("/test_history")
                .route(web::post().to(create_test_history))
                .route(web::put().to(update_test_history)),
        )
        .service(
            web::resource("/test_history_resolution")
                .route(web::put().to(update_test_history_resolution)),
        )
        .service(
            web::resource(r"/tests_history/test_run/{test_run_id:\d+}")
                .route(web::get().to(get_test_run_breakdown)),
        )
        .service(
            web::resource(r"/tests_history/test_status/{test_status_id:\d+}/test_run/{test_run_id:\d+}")
                .route(web::get().to(get_test_histories_by_status_and_test_run)),
        )
        .service(
            web::resource(r"/tests_history/test_status/{test_status_id:\d+}")
                .route(web::get().to(get_test_histories_by_status)),
        )
        .service(
            web::resource(r"/tests_history/test_resolution/{test_resolution_id:\d+}")
                .route(web::get().to(get_test_histories_by_resolution)),
        )
        .service(
            web::resource(r"/tests_history/test_suite/{test_suite_id:\d+}")
                .route(web::get().to(get_test_histories_by_suite)),
        );
}
