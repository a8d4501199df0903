//! Test run endpoints, durations and tallies.

use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_create_test_run_validation() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = post_json(
        &app,
        "/api/v1/test_run",
        json!({ "start_datetime": "2024-01-01T00:00:00" }),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("launch_id"));

    let (status, _) = post_json(
        &app,
        "/api/v1/test_run",
        json!({ "start_datetime": "2024-01-01T00:00:00", "launch_id": 77 }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = post_json(
        &app,
        "/api/v1/test_run",
        json!({ "start_datetime": "last tuesday", "launch_id": 77 }),
    )
    .await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_closed_run_has_calendar_duration() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "web").await;

    let (status, body) = put_json(
        &app,
        "/api/v1/test_run",
        json!({
            "test_run_id": run.test_run_id,
            "end_datetime": "2024-02-04T01:02:03",
            "test_run_status": "successful",
            "data": { "commit": "abc123" },
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Test run updated successfully");

    let (_, test_run) = get_json(&app, &format!("/api/v1/test_run/{}", run.test_run_id)).await;
    assert_eq!(test_run["test_run_status"], "Successful");
    assert_eq!(test_run["launch"], "nightly");
    assert_eq!(test_run["start_datetime"], "2024-01-01T00:00:00");
    assert_eq!(test_run["end_datetime"], "2024-02-04T01:02:03");
    assert_eq!(test_run["data"]["commit"], "abc123");
    assert_eq!(
        test_run["duration"],
        json!({
            "years": 0,
            "months": 1,
            "days": 3,
            "hours": 1,
            "minutes": 2,
            "seconds": 3,
            "microseconds": 0,
        })
    );
}

#[actix_rt::test]
async fn test_running_run_duration_is_measured_to_now() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "web").await;

    let (_, test_run) = get_json(&app, &format!("/api/v1/test_run/{}", run.test_run_id)).await;

    assert!(test_run["end_datetime"].is_null());
    let duration = &test_run["duration"];
    assert!(duration.is_object());
    assert!(duration["years"].as_i64().unwrap() >= 0);
    assert!(duration["days"].as_i64().unwrap() >= 0);
}

#[actix_rt::test]
async fn test_close_without_status_derives_from_tests() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "web").await;
    let suite = start_suite(&app, "web", run.test_run_id, "checkout").await;
    record_test(&app, run.test_run_id, suite, "pays by card", "Failed").await;

    put_json(
        &app,
        "/api/v1/test_run",
        json!({ "test_run_id": run.test_run_id }),
    )
    .await;

    let (_, test_run) = get_json(&app, &format!("/api/v1/test_run/{}", run.test_run_id)).await;
    assert_eq!(test_run["test_run_status"], "Failed");
    assert!(test_run["end_datetime"].is_string());
    assert_eq!(test_run["data"], json!(null));
}

#[actix_rt::test]
async fn test_update_test_run_rejects_unknown_status() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "web").await;

    let (status, body) = put_json(
        &app,
        "/api/v1/test_run",
        json!({ "test_run_id": run.test_run_id, "test_run_status": "Exploded" }),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("Unknown run status"));

    let (status, body) = put_json(
        &app,
        "/api/v1/test_run",
        json!({ "test_run_id": 999, "test_run_status": "Failed" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "No test run with the id provided was found");
}

#[actix_rt::test]
async fn test_runs_by_launch_include_tallies() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "web").await;
    let suite = start_suite(&app, "web", run.test_run_id, "search").await;
    record_test(&app, run.test_run_id, suite, "finds by title", "Passed").await;
    record_test(&app, run.test_run_id, suite, "finds by tag", "Passed").await;
    record_test(&app, run.test_run_id, suite, "handles typos", "Failed").await;

    let (status, runs) = get_json(&app, &format!("/api/v1/test_run/launch/{}", run.launch_id)).await;
    assert_eq!(status, 200);

    let first = &runs[0];
    assert_eq!(first["test_run_id"], run.test_run_id);
    assert_eq!(first["launch_id"], run.launch_id);
    assert_eq!(first["project_id"], run.project_id);
    assert_eq!(first["launch_name"], "nightly");
    assert_eq!(first["launch_status"], "Running");
    assert_eq!(first["tests_total"], 3);
    assert_eq!(first["tests_passed"], 2);
    assert_eq!(first["tests_failed"], 1);
    assert_eq!(first["tests_running"], 0);
    assert_eq!(first["tests_incomplete"], 0);
    assert_eq!(first["tests_skipped"], 0);

    let (status, missing) = get_json(&app, "/api/v1/test_run/launch/999").await;
    assert_eq!(status, 200);
    assert_eq!(
        missing["message"],
        "No launch with the launch id provided was found"
    );
}
