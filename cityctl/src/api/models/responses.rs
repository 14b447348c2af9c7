//! Response envelope shared by every endpoint.
//!
//! ```json
//! {"status": "success", "data": {...}}
//! {"status": "error", "data": null, "message": "City with ID 7 not found"}
//! ```
//!
//! Paginated endpoints use [`super::pagination::PaginatedResponse`], which adds `meta`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

/// Successful response carrying a single value
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T: ToSchema> {
    /// Always `success`
    pub status: String,
    pub data: T,
}

impl<T: ToSchema> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            data,
        }
    }
}

/// Error response: `data` is always null and `message` says what went wrong
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `error`
    pub status: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            data: None,
            message: message.into(),
        }
    }
}
