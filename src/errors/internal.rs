use thiserror::Error;

/// Internal error type for store and service operations
///
/// Infrastructure failures only; domain outcomes use the typed errors in the
/// sibling modules. Not exposed via API - endpoints must convert to the API
/// error types, which log the detail and respond generically.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error("Database error: {operation} failed: {source}")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> Self {
        InternalError::Database {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> Self {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
