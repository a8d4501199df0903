//! Liveness, setup and routing behaviour.

use actix_web::test;
use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_status_reports_running() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = get_json(&app, "/api/v1/status").await;

    assert_eq!(status, 200);
    assert_eq!(body, json!("Reporter service up and running"));
}

#[actix_rt::test]
async fn test_ready_pings_database() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = get_json(&app, "/api/v1/ready").await;

    assert_eq!(status, 200);
    assert_eq!(body["database"], "connected");
}

#[actix_rt::test]
async fn test_initial_setup_is_idempotent() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    for _ in 0..2 {
        let (status, body) = post_json(&app, "/api/v1/initial_setup", json!({})).await;
        assert_eq!(status, 200);
        assert_eq!(body["message"], "Database initialized successfully");
    }
}

#[actix_rt::test]
async fn test_unmapped_path_is_json_404() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    for uri in [
        "/api/v1/nope",
        "/somewhere/else",
        "/api/v1/launch/abc",
        "/api/v1/launch/-1",
        "/api/v1/launch/99999999999",
        "/api/v1/test_run/x",
        "/api/v1/tests_history/test_status/1/test_run/99999999999",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, 404, "{}", uri);
        assert_eq!(body["message"], "The endpoint requested was not found");
    }
}

#[actix_rt::test]
async fn test_json_without_content_type_is_accepted() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/project")
        .set_payload(r#"{"name": "plain-body"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "New project added successfully");
}

#[actix_rt::test]
async fn test_malformed_json_is_rejected() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/project")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_INPUT");
}
