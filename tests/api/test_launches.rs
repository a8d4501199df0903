//! Launch endpoints and launch status derivation.

use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_launch_creates_project_on_demand() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = post_json(
        &app,
        "/api/v1/launch",
        json!({ "project": "desktop", "name": "release-1.2" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "New launch added successfully");

    let (_, launch) = get_json(&app, &format!("/api/v1/launch/{}", body["id"])).await;
    assert_eq!(launch["name"], "release-1.2");
    assert_eq!(launch["project"], "desktop");
    assert_eq!(launch["launch_status"], "Running");

    let (_, projects) = get_json(&app, "/api/v1/projects").await;
    assert_eq!(projects[0]["name"], "desktop");
}

#[actix_rt::test]
async fn test_get_missing_launch_is_a_message() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = get_json(&app, "/api/v1/launch/999").await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({ "message": "No launch with the id provided was found" }));
}

#[actix_rt::test]
async fn test_finish_launch_failed_when_a_run_failed() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "mobile").await;

    let (status, _) = put_json(
        &app,
        "/api/v1/test_run",
        json!({ "test_run_id": run.test_run_id, "test_run_status": "Failed" }),
    )
    .await;
    assert_eq!(status, 200);

    let (status, body) = put_json(
        &app,
        "/api/v1/finish_launch",
        json!({ "launch_id": run.launch_id }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Launch updated successfully");
    assert_eq!(body["id"], run.launch_id);

    let (_, launch) = get_json(&app, &format!("/api/v1/launch/{}", run.launch_id)).await;
    assert_eq!(launch["launch_status"], "Failed");
}

#[actix_rt::test]
async fn test_finish_launch_successful_without_failed_runs() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "mobile").await;

    put_json(
        &app,
        "/api/v1/test_run",
        json!({ "test_run_id": run.test_run_id, "test_run_status": 2 }),
    )
    .await;
    put_json(
        &app,
        "/api/v1/finish_launch",
        json!({ "launch_id": run.launch_id }),
    )
    .await;

    let (_, launch) = get_json(&app, &format!("/api/v1/launch/{}", run.launch_id)).await;
    assert_eq!(launch["launch_status"], "Successful");
}

#[actix_rt::test]
async fn test_finish_launch_validation() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, _) = put_json(&app, "/api/v1/finish_launch", json!({})).await;
    assert_eq!(status, 400);

    let (status, body) = put_json(&app, "/api/v1/finish_launch", json!({ "launch_id": 42 })).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "No launch with the id provided was found");
}

#[actix_rt::test]
async fn test_launches_by_project_carry_run_stats() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let run = start_run(&app, "mobile").await;
    let suite = start_suite(&app, "mobile", run.test_run_id, "login").await;
    record_test(&app, run.test_run_id, suite, "logs in", "Passed").await;
    record_test(&app, run.test_run_id, suite, "rejects bad password", "Failed").await;

    // A second launch without any test runs still appears.
    post_json(
        &app,
        "/api/v1/launch",
        json!({ "project": "mobile", "name": "empty" }),
    )
    .await;

    let (status, launches) =
        get_json(&app, &format!("/api/v1/launch/project/{}", run.project_id)).await;
    assert_eq!(status, 200);

    let launches = launches.as_array().unwrap();
    assert_eq!(launches.len(), 2);

    let stats = &launches[0]["test_run_stats"];
    assert_eq!(launches[0]["project"], "mobile");
    assert_eq!(stats[0]["test_run_id"], run.test_run_id);
    assert_eq!(stats[0]["test_type"], "e2e");
    assert_eq!(stats[0]["tests_total"], 2);
    assert_eq!(stats[0]["tests_passed"], 1);
    assert_eq!(stats[0]["tests_failed"], 1);

    assert_eq!(launches[1]["test_run_stats"], json!([]));

    let (_, missing) = get_json(&app, "/api/v1/launch/project/999").await;
    assert_eq!(
        missing["message"],
        "No launch with the project id provided was found"
    );
}
