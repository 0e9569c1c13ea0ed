use thiserror::Error;

use crate::errors::InternalError;

/// Errors from assignment and entity-management operations
///
/// Validation and not-found are detected before any mutation and carry
/// structured detail; integrity conflicts map unique-constraint violations
/// on create.
#[derive(Error, Debug)]
pub enum RbacError {
    #[error("validation failed on {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("{resource} not found: {}", .missing_ids.join(", "))]
    NotFound {
        resource: &'static str,
        missing_ids: Vec<String>,
    },

    #[error("{field} already exists")]
    IntegrityConflict { field: &'static str },

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl RbacError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        RbacError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str, missing_ids: Vec<String>) -> Self {
        RbacError::NotFound {
            resource,
            missing_ids,
        }
    }

    /// Map a failed insert to IntegrityConflict when the database reports a
    /// unique-constraint violation (covers races the pre-check cannot see)
    pub fn insert_conflict(field: &'static str, err: InternalError) -> Self {
        if let InternalError::Database { source, .. } = &err {
            let message = source.to_string();
            if message.contains("UNIQUE") || message.contains("duplicate key") {
                return RbacError::IntegrityConflict { field };
            }
        }
        RbacError::Internal(err)
    }
}
