use thiserror::Error;

use crate::errors::InternalError;

/// Token verification failures, each mapped to a distinct kind
#[derive(Error, Debug)]
pub enum TokenError {
    /// Signature is valid but the token has expired
    #[error("token expired")]
    Expired,

    /// Bad signature, malformed token, or claim mismatch (issuer/audience)
    #[error("token invalid")]
    Invalid,

    /// Subject no longer resolves to a live, non-deleted user
    #[error("token subject not found")]
    UserNotFound,

    #[error(transparent)]
    Internal(#[from] InternalError),
}
