use poem_openapi::{payload::Json, ApiResponse};

use super::ErrorBody;
use crate::errors::{AuthError, TokenError};

/// Error responses for the authentication endpoints
#[derive(ApiResponse, Debug)]
pub enum AuthApiError {
    /// Uniform unauthorized response
    #[oai(status = 401)]
    Unauthorized(Json<ErrorBody>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorBody>),
}

impl AuthApiError {
    /// Create the uniform invalid-credentials response
    pub fn invalid_credentials() -> Self {
        AuthApiError::Unauthorized(Json(ErrorBody::new(
            "invalid_credentials",
            "Invalid username or password",
            401,
        )))
    }

    pub fn invalid_token() -> Self {
        AuthApiError::Unauthorized(Json(ErrorBody::new(
            "invalid_token",
            "Invalid or malformed token",
            401,
        )))
    }

    pub fn expired_token() -> Self {
        AuthApiError::Unauthorized(Json(ErrorBody::new(
            "expired_token",
            "Token has expired",
            401,
        )))
    }

    pub fn token_subject_not_found() -> Self {
        AuthApiError::Unauthorized(Json(ErrorBody::new(
            "token_subject_not_found",
            "Token subject no longer exists",
            401,
        )))
    }

    pub fn internal() -> Self {
        AuthApiError::InternalError(Json(ErrorBody::new(
            "internal_error",
            "Internal server error",
            500,
        )))
    }
}

impl From<AuthError> for AuthApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AuthApiError::invalid_credentials(),
            // Lock and inactive state must not be distinguishable from a
            // wrong password on the public surface.
            AuthError::AccountLocked { .. } | AuthError::AccountInactive => {
                AuthApiError::invalid_credentials()
            }
            AuthError::Internal(e) => {
                tracing::error!("authentication failed internally: {e}");
                AuthApiError::internal()
            }
        }
    }
}

impl From<TokenError> for AuthApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthApiError::expired_token(),
            TokenError::Invalid => AuthApiError::invalid_token(),
            TokenError::UserNotFound => AuthApiError::token_subject_not_found(),
            TokenError::Internal(e) => {
                tracing::error!("token verification failed internally: {e}");
                AuthApiError::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of(err: &AuthApiError) -> &ErrorBody {
        match err {
            AuthApiError::Unauthorized(json) => &json.0,
            AuthApiError::InternalError(json) => &json.0,
        }
    }

    #[test]
    fn test_locked_and_inactive_fold_into_invalid_credentials() {
        let from_locked = AuthApiError::from(AuthError::AccountLocked { locked_until: 99 });
        let from_inactive = AuthApiError::from(AuthError::AccountInactive);
        let from_wrong_password = AuthApiError::from(AuthError::InvalidCredentials);

        // All three produce byte-identical public responses
        for err in [&from_locked, &from_inactive, &from_wrong_password] {
            let body = body_of(err);
            assert_eq!(body.error, "invalid_credentials");
            assert_eq!(body.status_code, 401);
            assert_eq!(body.detail, None);
        }

        // The lock timestamp must not leak into any public field
        assert!(!body_of(&from_locked).message.contains("99"));
    }

    #[test]
    fn test_token_errors_map_to_distinct_codes() {
        let expired = AuthApiError::from(TokenError::Expired);
        let invalid = AuthApiError::from(TokenError::Invalid);
        let gone = AuthApiError::from(TokenError::UserNotFound);

        assert_eq!(body_of(&expired).error, "expired_token");
        assert_eq!(body_of(&invalid).error, "invalid_token");
        assert_eq!(body_of(&gone).error, "token_subject_not_found");
    }
}
