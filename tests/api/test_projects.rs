//! Project endpoints.

use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_create_project_twice_recovers_same_id() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, first) = post_json(&app, "/api/v1/project", json!({ "name": "mobile" })).await;
    assert_eq!(status, 200);
    assert_eq!(first["message"], "New project added successfully");

    let (status, second) = post_json(&app, "/api/v1/project", json!({ "name": "mobile" })).await;
    assert_eq!(status, 200);
    assert_eq!(second["message"], "Project recovered successfully");
    assert_eq!(first["id"], second["id"]);
}

#[actix_rt::test]
async fn test_create_project_requires_name() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = post_json(&app, "/api/v1/project", json!({})).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
    assert!(body["message"].as_str().unwrap().contains("'name'"));
}

#[actix_rt::test]
async fn test_list_and_get_projects() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (_, body) = get_json(&app, "/api/v1/projects").await;
    assert_eq!(body["message"], "No projects were found");

    let (_, created) = post_json(&app, "/api/v1/project", json!({ "name": "web" })).await;
    let id = created["id"].as_i64().unwrap();

    let (status, list) = get_json(&app, "/api/v1/projects").await;
    assert_eq!(status, 200);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["project_id"], id);
    assert_eq!(list[0]["project_status"], "Created");

    let (_, project) = get_json(&app, &format!("/api/v1/project/{}", id)).await;
    assert_eq!(project["name"], "web");
    assert!(project["data"].is_null());

    let (status, missing) = get_json(&app, "/api/v1/project/999").await;
    assert_eq!(status, 200);
    assert_eq!(
        missing["message"],
        "No project with the id provided was found"
    );
}
