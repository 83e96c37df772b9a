//! Shared response envelope types for API handlers.
//!
//! Successful responses use a `{ "success": true, "data": ..., "message": ... }`
//! envelope; errors mirror it with `"success": false` (see `error.rs`). Use
//! [`DataResponse`] instead of ad-hoc `serde_json::json!` so the shape stays
//! consistent across handlers.

use serde::Serialize;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> DataResponse<T> {
    /// Wrap a payload with no message.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// Wrap a payload with a human-readable message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}
