//! Liveness, readiness and setup endpoints.

use std::time::Duration;

use actix_web::{HttpResponse, get, post, web};
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::MessageResponse;

/// Upper bound on the readiness probe query.
const READY_TIMEOUT: Duration = Duration::from_secs(2);

/// Body returned by the liveness endpoint.
pub const STATUS_MESSAGE: &str = "Reporter service up and running";

/// Readiness check response.
#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    status: &'static str,
    database: &'static str,
}

/// Liveness check. Returns a JSON string.
#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = String)
    )
)]
#[get("/status")]
pub async fn status() -> HttpResponse {
    HttpResponse::Ok().json(STATUS_MESSAGE)
}

/// Readiness check endpoint.
///
/// Returns 200 if the database answers a trivial query in time.
#[utoipa::path(
    get,
    path = "/api/v1/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service unavailable")
    )
)]
#[get("/ready")]
pub async fn ready(pool: web::Data<DbPool>) -> HttpResponse {
    let conn = pool.connection();
    let stmt = Statement::from_string(conn.get_database_backend(), "SELECT 1".to_owned());
    match tokio::time::timeout(READY_TIMEOUT, conn.query_one_raw(stmt)).await {
        Ok(Ok(_)) => HttpResponse::Ok().json(ReadyResponse {
            status: "ready",
            database: "connected",
        }),
        Ok(Err(e)) => {
            warn!("Readiness check failed: {}", e);
            not_ready()
        }
        Err(_) => {
            warn!("Readiness check timed out after {:?}", READY_TIMEOUT);
            not_ready()
        }
    }
}

fn not_ready() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(serde_json::json!({
        "error": "NOT_READY",
        "message": "Database connection failed"
    }))
}

/// Seed the status lookup tables. Safe to call repeatedly.
#[utoipa::path(
    post,
    path = "/api/v1/initial_setup",
    tag = "Health",
    responses(
        (status = 200, description = "Lookup tables seeded", body = MessageResponse),
        (status = 500, description = "Database error", body = crate::error::ErrorResponse)
    )
)]
#[post("/initial_setup")]
pub async fn initial_setup(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    info!("Initial setup requested");
    pool.seed_status_tables().await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Database initialized successfully")))
}

/// Configure health routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(status).service(ready).service(initial_setup);
}
