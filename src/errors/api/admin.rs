use poem_openapi::{payload::Json, ApiResponse};

use super::ErrorBody;
use crate::errors::{RbacError, TokenError};

/// Error responses for the administrative and assignment endpoints
///
/// Unlike the public login surface these responses carry structured detail:
/// which field failed validation, which ids were missing.
#[derive(ApiResponse, Debug)]
pub enum AdminApiError {
    /// Caller's bearer token was missing, invalid or stale
    #[oai(status = 401)]
    Unauthorized(Json<ErrorBody>),

    /// Cardinality or duplicate violation
    #[oai(status = 422)]
    Validation(Json<ErrorBody>),

    /// Entity or association target missing
    #[oai(status = 404)]
    NotFound(Json<ErrorBody>),

    /// Unique constraint violation on create
    #[oai(status = 409)]
    Conflict(Json<ErrorBody>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorBody>),
}

impl AdminApiError {
    pub fn internal() -> Self {
        AdminApiError::InternalError(Json(ErrorBody::new(
            "internal_error",
            "Internal server error",
            500,
        )))
    }
}

impl From<TokenError> for AdminApiError {
    fn from(err: TokenError) -> Self {
        if let TokenError::Internal(e) = &err {
            tracing::error!("caller token verification failed internally: {e}");
            return AdminApiError::internal();
        }
        AdminApiError::Unauthorized(Json(ErrorBody::new(
            "unauthorized",
            "A valid bearer token is required",
            401,
        )))
    }
}

impl From<RbacError> for AdminApiError {
    fn from(err: RbacError) -> Self {
        match err {
            RbacError::Validation { field, message } => AdminApiError::Validation(Json(
                ErrorBody::new("validation_error", message, 422)
                    .with_detail(vec![field.to_string()]),
            )),
            RbacError::NotFound {
                resource,
                missing_ids,
            } => AdminApiError::NotFound(Json(
                ErrorBody::new("not_found", format!("{resource} not found"), 404)
                    .with_detail(missing_ids),
            )),
            RbacError::IntegrityConflict { field } => AdminApiError::Conflict(Json(
                ErrorBody::new("conflict", format!("{field} already exists"), 409)
                    .with_detail(vec![field.to_string()]),
            )),
            RbacError::Internal(e) => {
                tracing::error!("management operation failed internally: {e}");
                AdminApiError::internal()
            }
        }
    }
}
