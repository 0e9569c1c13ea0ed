// API error surfaces - conversions from domain errors to HTTP responses
pub mod admin;
pub mod auth;

pub use admin::AdminApiError;
pub use auth::AuthApiError;

use poem_openapi::Object;

/// Standardized error response body
#[derive(Object, Debug)]
pub struct ErrorBody {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Structured detail (e.g. missing ids), when available
    pub detail: Option<Vec<String>>,

    /// HTTP status code
    pub status_code: u16,
}

impl ErrorBody {
    pub fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            detail: None,
            status_code,
        }
    }

    pub fn with_detail(mut self, detail: Vec<String>) -> Self {
        self.detail = Some(detail);
        self
    }
}
