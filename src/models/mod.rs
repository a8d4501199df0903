//! Domain models shared by the data-access and HTTP layers.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

pub mod duration;
pub mod status;
pub mod timestamp;

// Re-export commonly used types
pub use duration::CalendarDelta;
pub use status::{
    ProjectStatus, RunStatus, StatusLookup, StatusRef, TestResolution, TestStatus,
};

/// Counts of test executions by status under one parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusTally {
    pub tests_total: i64,
    pub tests_failed: i64,
    pub tests_passed: i64,
    pub tests_running: i64,
    pub tests_incomplete: i64,
    pub tests_skipped: i64,
}

/// Response carrying only a message.
///
/// Also used with a 200 status for lookups that found nothing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

/// Response for writes that report the affected row id.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IdResponse {
    pub message: String,
    pub id: i32,
}

impl IdResponse {
    pub fn new(message: impl Into<String>, id: i32) -> Self {
        IdResponse {
            message: message.into(),
            id,
        }
    }
}

/// Unwrap a required request field.
pub fn require<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::missing_field(field))
}

/// Unwrap a required text field; blank strings count as missing.
pub fn require_text(value: Option<String>, field: &str) -> AppResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(AppError::missing_field(field)),
    }
}
