//! Shared test helpers for API tests.

use actix_web::{App, dev::ServiceResponse, test, web};
use serde_json::{Value, json};
use testrun_reporter_lib::api;
use testrun_reporter_lib::config::DatabaseConfig;
use testrun_reporter_lib::db::DbPool;
use testrun_reporter_lib::middleware::RequestLogger;

/// Create a fresh, migrated and seeded in-memory database.
pub async fn create_test_pool() -> DbPool {
    let pool = DbPool::connect(&DatabaseConfig::single("sqlite::memory:"))
        .await
        .expect("Failed to open in-memory database");

    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool.seed_status_tables()
        .await
        .expect("Failed to seed status tables");

    pool
}

/// Create a test reporter app wired like the server binary.
pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .wrap(RequestLogger)
            .app_data(web::Data::new(pool.clone()))
            .app_data(api::json_config())
            .app_data(api::path_config())
            .service(web::scope("/api/v1").configure(api::configure_api))
            .default_service(web::route().to(api::not_found)),
    )
    .await
}

async fn send<S>(app: &S, req: test::TestRequest) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// GET a path and decode the JSON body.
pub async fn get_json<S>(app: &S, uri: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    send(app, test::TestRequest::get().uri(uri)).await
}

/// POST a JSON body and decode the JSON response.
pub async fn post_json<S>(app: &S, uri: &str, body: Value) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    send(app, test::TestRequest::post().uri(uri).set_json(body)).await
}

/// PUT a JSON body and decode the JSON response.
pub async fn put_json<S>(app: &S, uri: &str, body: Value) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    send(app, test::TestRequest::put().uri(uri).set_json(body)).await
}

/// Ids of a freshly started launch and test run.
pub struct RunFixture {
    pub project_id: i64,
    pub launch_id: i64,
    pub test_run_id: i64,
}

/// Create a launch (and its project) with one running test run.
pub async fn start_run<S>(app: &S, project: &str) -> RunFixture
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (_, project_body) = post_json(app, "/api/v1/project", json!({ "name": project })).await;
    let (status, launch) = post_json(
        app,
        "/api/v1/launch",
        json!({ "project": project, "name": "nightly", "data": { "branch": "main" } }),
    )
    .await;
    assert_eq!(status, 200, "Failed to create launch: {}", launch);

    let launch_id = launch["id"].as_i64().unwrap();
    let (status, run) = post_json(
        app,
        "/api/v1/test_run",
        json!({
            "start_datetime": "2024-01-01T00:00:00",
            "test_type": "e2e",
            "launch_id": launch_id,
        }),
    )
    .await;
    assert_eq!(status, 200, "Failed to create test run: {}", run);

    RunFixture {
        project_id: project_body["id"].as_i64().unwrap(),
        launch_id,
        test_run_id: run["id"].as_i64().unwrap(),
    }
}

/// Start a suite in a run; returns `(test_suite_history_id, test_suite_id)`.
pub async fn start_suite<S>(app: &S, project: &str, test_run_id: i64, name: &str) -> (i64, i64)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = post_json(
        app,
        "/api/v1/test_suite_history",
        json!({
            "project": project,
            "name": name,
            "test_type": "e2e",
            "start_datetime": "2024-01-01T00:00:00",
            "test_run_id": test_run_id,
        }),
    )
    .await;
    assert_eq!(status, 200, "Failed to start suite: {}", body);

    (
        body["test_suite_history_id"].as_i64().unwrap(),
        body["test_suite_id"].as_i64().unwrap(),
    )
}

/// Start a test in a suite history and close it with `status`; returns the test history id.
pub async fn record_test<S>(
    app: &S,
    test_run_id: i64,
    suite: (i64, i64),
    name: &str,
    status: &str,
) -> i64
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (history_id, suite_id) = suite;
    let (code, body) = post_json(
        app,
        "/api/v1/test_history",
        json!({
            "name": name,
            "test_suite_id": suite_id,
            "start_datetime": "2024-01-01T00:00:00",
            "test_run_id": test_run_id,
            "test_suite_history_id": history_id,
        }),
    )
    .await;
    assert_eq!(code, 200, "Failed to start test: {}", body);
    let test_history_id = body["test_history_id"].as_i64().unwrap();

    let (code, body) = put_json(
        app,
        "/api/v1/test_history",
        json!({
            "test_history_id": test_history_id,
            "end_datetime": "2024-01-01T00:00:05",
            "test_status": status,
            "message": if status == "Failed" { Some("expected true") } else { None },
        }),
    )
    .await;
    assert_eq!(code, 200, "Failed to close test: {}", body);

    test_history_id
}
