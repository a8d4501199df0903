//! Test suite and suite history endpoints.

use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_suite_lookup_is_keyed_by_project_and_type() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (_, first) = post_json(
        &app,
        "/api/v1/test_suite",
        json!({ "project": "web", "name": "login", "test_type": "e2e" }),
    )
    .await;
    assert_eq!(first["message"], "New test suite added successfully");

    let (_, again) = post_json(
        &app,
        "/api/v1/test_suite",
        json!({ "project": "web", "name": "login", "test_type": "e2e" }),
    )
    .await;
    assert_eq!(again["message"], "Test suite is already present");
    assert_eq!(again["test_suite_id"], first["test_suite_id"]);

    let (_, other_type) = post_json(
        &app,
        "/api/v1/test_suite",
        json!({ "project": "web", "name": "login", "test_type": "unit" }),
    )
    .await;
    assert_ne!(other_type["test_suite_id"], first["test_suite_id"]);

    let (_, untyped) = post_json(
        &app,
        "/api/v1/test_suite",
        json!({ "project": "web", "name": "login" }),
    )
    .await;
    assert_eq!(untyped["message"], "New test suite added successfully");

    let (_, untyped_again) = post_json(
        &app,
        "/api/v1/test_suite",
        json!({ "project": "web", "name": "login" }),
    )
    .await;
    assert_eq!(untyped_again["test_suite_id"], untyped["test_suite_id"]);

    let (_, other_project) = post_json(
        &app,
        "/api/v1/test_suite",
        json!({ "project": "desktop", "name": "login", "test_type": "e2e" }),
    )
    .await;
    assert_ne!(other_project["test_suite_id"], first["test_suite_id"]);
}

#[actix_rt::test]
async fn test_get_test_suite() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (_, created) = post_json(
        &app,
        "/api/v1/test_suite",
        json!({ "project": "web", "name": "cart", "test_type": "integration" }),
    )
    .await;

    let (_, suite) = get_json(
        &app,
        &format!("/api/v1/test_suite/{}", created["test_suite_id"]),
    )
    .await;
    assert_eq!(suite["name"], "cart");
    assert_eq!(suite["test_type"], "integration");

    let (status, missing) = get_json(&app, "/api/v1/test_suite/999").await;
    assert_eq!(status, 200);
    assert_eq!(
        missing["message"],
        "No test suite with the id provided was found"
    );
}

#[actix_rt::test]
async fn test_suite_history_requires_existing_run() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, _) = post_json(
        &app,
        "/api/v1/test_suite_history",
        json!({
            "project": "web",
            "name": "login",
            "start_datetime": "2024-01-01T00:00:00",
            "test_run_id": 5,
        }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = post_json(
        &app,
        "/api/v1/test_suite_history",
        json!({ "project": "web", "name": "login", "test_run_id": 5 }),
    )
    .await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_close_suite_history_with_and_without_status() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "web").await;

    let passing = start_suite(&app, "web", run.test_run_id, "profile").await;
    record_test(&app, run.test_run_id, passing, "edits avatar", "Passed").await;

    let failing = start_suite(&app, "web", run.test_run_id, "billing").await;
    record_test(&app, run.test_run_id, failing, "charges card", "Failed").await;

    let overridden = start_suite(&app, "web", run.test_run_id, "search").await;
    record_test(&app, run.test_run_id, overridden, "finds", "Failed").await;

    for (history_id, status) in [(passing.0, None), (failing.0, None), (overridden.0, Some("Successful"))] {
        let (code, body) = put_json(
            &app,
            "/api/v1/test_suite_history",
            json!({
                "test_suite_history_id": history_id,
                "end_datetime": "2024-01-01T00:10:00",
                "test_suite_status": status,
            }),
        )
        .await;
        assert_eq!(code, 200);
        assert_eq!(body["message"], "Test suite history updated successfully");
    }

    let (status, histories) = get_json(
        &app,
        &format!("/api/v1/tests_suite_history/test_run/{}", run.test_run_id),
    )
    .await;
    assert_eq!(status, 200);

    let statuses: Vec<&str> = histories
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["test_suite_status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["Successful", "Failed", "Successful"]);
    assert_eq!(histories[1]["name"], "billing");
    assert_eq!(histories[1]["duration"]["minutes"], 10);

    let (_, failed_only) = get_json(
        &app,
        &format!(
            "/api/v1/tests_suite_history/test_status/3/test_run/{}",
            run.test_run_id
        ),
    )
    .await;
    assert_eq!(failed_only.as_array().unwrap().len(), 1);
    assert_eq!(failed_only[0]["test_suite_history_id"], failing.0);

    let (_, none_running) = get_json(
        &app,
        &format!(
            "/api/v1/tests_suite_history/test_status/1/test_run/{}",
            run.test_run_id
        ),
    )
    .await;
    assert_eq!(none_running["message"], "No tests suites were found");
}
