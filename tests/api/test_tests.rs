//! Tests, test executions and the test run breakdown.

use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_tests_are_found_by_name() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (_, suite) = post_json(
        &app,
        "/api/v1/test_suite",
        json!({ "project": "web", "name": "login" }),
    )
    .await;
    let suite_id = suite["test_suite_id"].clone();

    let (_, first) = post_json(
        &app,
        "/api/v1/test",
        json!({ "name": "logs in", "test_suite_id": suite_id }),
    )
    .await;
    assert_eq!(first["message"], "New test added successfully");

    let (_, again) = post_json(
        &app,
        "/api/v1/test",
        json!({ "name": "logs in", "test_suite_id": suite_id }),
    )
    .await;
    assert_eq!(again["message"], "Test is already present");
    assert_eq!(again["test_id"], first["test_id"]);

    let (_, test) = get_json(&app, &format!("/api/v1/test/{}", first["test_id"])).await;
    assert_eq!(test["name"], "logs in");
    assert_eq!(test["test_suite_id"], suite_id);

    let (_, missing) = get_json(&app, "/api/v1/test/999").await;
    assert_eq!(missing["message"], "No test with the id provided was found");

    let (status, _) = post_json(
        &app,
        "/api/v1/test",
        json!({ "name": "orphan", "test_suite_id": 999 }),
    )
    .await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_update_test_history_validation() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "web").await;
    let suite = start_suite(&app, "web", run.test_run_id, "login").await;
    let history_id = record_test(&app, run.test_run_id, suite, "logs in", "Passed").await;

    let (status, _) = put_json(
        &app,
        "/api/v1/test_history",
        json!({ "test_history_id": history_id }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, body) = put_json(
        &app,
        "/api/v1/test_history",
        json!({ "test_history_id": history_id, "test_status": "Exploded" }),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("Unknown test status"));

    let (status, body) = put_json(
        &app,
        "/api/v1/test_history",
        json!({ "test_history_id": 999, "test_status": "Passed" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "No test history with the id provided was found");
}

#[actix_rt::test]
async fn test_long_diagnostics_are_stored_whole() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "web").await;
    let (history_id, suite_id) = start_suite(&app, "web", run.test_run_id, "login").await;

    let (_, started) = post_json(
        &app,
        "/api/v1/test_history",
        json!({
            "name": "deeply nested case",
            "test_suite_id": suite_id,
            "start_datetime": "2024-01-01T00:00:00",
            "test_run_id": run.test_run_id,
            "test_suite_history_id": history_id,
        }),
    )
    .await;

    let file = format!("cypress/e2e/{}/login.cy.ts", "nested".repeat(300));
    let error_type = "AssertionError".repeat(40);

    let (status, body) = put_json(
        &app,
        "/api/v1/test_history",
        json!({
            "test_history_id": started["test_history_id"],
            "end_datetime": "2024-01-01T00:00:03",
            "file": file,
            "error_type": error_type,
            "test_status": "Failed",
        }),
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["message"], "Test history updated successfully");

    let (_, failed) = get_json(
        &app,
        &format!("/api/v1/tests_history/test_status/3/test_run/{}", run.test_run_id),
    )
    .await;
    assert_eq!(failed[0]["file"], file);
    assert_eq!(failed[0]["error_type"], error_type);
}

#[actix_rt::test]
async fn test_test_history_requires_matching_suite_history() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "web").await;
    let (_, suite_id) = start_suite(&app, "web", run.test_run_id, "login").await;

    let (status, _) = post_json(
        &app,
        "/api/v1/test_history",
        json!({
            "name": "logs in",
            "test_suite_id": suite_id,
            "start_datetime": "2024-01-01T00:00:00",
            "test_run_id": run.test_run_id,
            "test_suite_history_id": 999,
        }),
    )
    .await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_resolution_and_filters() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "web").await;
    let suite = start_suite(&app, "web", run.test_run_id, "login").await;
    record_test(&app, run.test_run_id, suite, "logs in", "Passed").await;
    let failed = record_test(&app, run.test_run_id, suite, "logs out", "Failed").await;

    let (status, body) = put_json(
        &app,
        "/api/v1/test_history_resolution",
        json!({ "test_history_id": failed, "test_resolution": "Flaky test" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Test history resolution updated successfully");

    let (status, _) = put_json(
        &app,
        "/api/v1/test_history_resolution",
        json!({ "test_history_id": failed, "test_resolution": "Cosmic rays" }),
    )
    .await;
    assert_eq!(status, 400);

    let (_, failed_in_run) = get_json(
        &app,
        &format!("/api/v1/tests_history/test_status/3/test_run/{}", run.test_run_id),
    )
    .await;
    let failed_in_run = failed_in_run.as_array().unwrap();
    assert_eq!(failed_in_run.len(), 1);
    assert_eq!(failed_in_run[0]["name"], "logs out");
    assert_eq!(failed_in_run[0]["message"], "expected true");
    assert_eq!(failed_in_run[0]["test_resolution"], "Flaky test");

    let (_, passed) = get_json(&app, "/api/v1/tests_history/test_status/2").await;
    assert_eq!(passed.as_array().unwrap().len(), 1);
    assert_eq!(passed[0]["test_status"], "Passed");
    assert_eq!(passed[0]["duration"]["seconds"], 5);

    let (_, flaky) = get_json(&app, "/api/v1/tests_history/test_resolution/5").await;
    assert_eq!(flaky[0]["test_history_id"], failed);

    let (_, unresolved) = get_json(&app, "/api/v1/tests_history/test_resolution/1").await;
    assert_eq!(unresolved.as_array().unwrap().len(), 1);

    let (_, skipped) = get_json(&app, "/api/v1/tests_history/test_status/4").await;
    assert_eq!(skipped["message"], "No tests were found");

    let (_, by_suite) = get_json(
        &app,
        &format!("/api/v1/tests_history/test_suite/{}", suite.1),
    )
    .await;
    let by_suite = by_suite.as_array().unwrap();
    assert_eq!(by_suite.len(), 2);
    assert_eq!(by_suite[0]["test_suite"], "login");
    assert_eq!(by_suite[0]["test_type"], "e2e");
}

#[actix_rt::test]
async fn test_run_breakdown() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "web").await;

    let (_, empty) = get_json(
        &app,
        &format!("/api/v1/tests_history/test_run/{}", run.test_run_id),
    )
    .await;
    assert_eq!(empty["message"], "No tests were found");

    let login = start_suite(&app, "web", run.test_run_id, "login").await;
    record_test(&app, run.test_run_id, login, "logs in", "Passed").await;
    record_test(&app, run.test_run_id, login, "logs out", "Failed").await;

    let search = start_suite(&app, "web", run.test_run_id, "search").await;
    record_test(&app, run.test_run_id, search, "finds", "Skipped").await;

    let (status, body) = get_json(
        &app,
        &format!("/api/v1/tests_history/test_run/{}", run.test_run_id),
    )
    .await;
    assert_eq!(status, 200);

    let breakdown = &body.as_array().unwrap()[0];
    assert_eq!(breakdown["test_run_id"], run.test_run_id);
    assert_eq!(breakdown["launch_id"], run.launch_id);
    assert_eq!(breakdown["project_id"], run.project_id);
    assert_eq!(breakdown["launch"], "nightly");
    assert_eq!(breakdown["test_run_status"], "Running");
    assert_eq!(breakdown["tests_total"], 3);

    let suites = breakdown["test_suites"].as_array().unwrap();
    assert_eq!(suites.len(), 2);

    assert_eq!(suites[0]["name"], "login");
    assert_eq!(suites[0]["tests_total"], 2);
    assert_eq!(suites[0]["tests_passed"], 1);
    assert_eq!(suites[0]["tests_failed"], 1);
    assert_eq!(suites[0]["tests"][1]["name"], "logs out");
    assert_eq!(suites[0]["tests"][1]["status"], "Failed");
    assert_eq!(suites[0]["tests"][1]["resolution"], "Unresolved");

    assert_eq!(suites[1]["name"], "search");
    assert_eq!(suites[1]["tests_skipped"], 1);
    assert_eq!(suites[1]["tests"].as_array().unwrap().len(), 1);

    let (_, missing) = get_json(&app, "/api/v1/tests_history/test_run/999").await;
    assert_eq!(missing["message"], "No tests were found");
}
