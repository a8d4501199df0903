//! API endpoint modules.

pub mod health;
pub mod launches;
pub mod openapi;
pub mod projects;
pub mod test_histories;
pub mod test_runs;
pub mod test_suites;

use actix_web::{HttpResponse, web};

use crate::error::AppError;
use crate::models::MessageResponse;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;

/// Largest accepted JSON body; stack traces can be long.
pub const MAX_JSON_BODY: usize = 4 * 1024 * 1024;

/// JSON extractor settings shared by all endpoints.
///
/// Bodies are parsed whatever their `Content-Type`; parse failures become 400s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BODY)
        .content_type_required(false)
        .error_handler(|err, _req| {
            AppError::InvalidInput(format!("Invalid JSON body: {}", err)).into()
        })
}

/// Path extractor settings shared by all endpoints.
///
/// Id segments that match a route but do not fit the id type are answered
/// like an unmapped route.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        tracing::debug!("Path rejected: {}", err);
        actix_web::error::InternalError::from_response(err, not_found_response()).into()
    })
}

/// Register every route under the API scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(projects::configure_routes)
        .configure(launches::configure_routes)
        .configure(test_runs::configure_routes)
        .configure(test_suites::configure_routes)
        .configure(test_histories::configure_routes);
}

/// Fallback for unmapped routes.
pub async fn not_found() -> HttpResponse {
    not_found_response()
}

fn not_found_response() -> HttpResponse {
    HttpResponse::NotFound().json(MessageResponse::new("The endpoint requested was not found"))
}
