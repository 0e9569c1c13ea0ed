use thiserror::Error;

use crate::errors::InternalError;

/// Authentication outcomes the core can distinguish
///
/// The public login endpoint folds everything except `Internal` into one
/// uniform invalid-credentials response so callers cannot probe for account
/// existence or lock state. Administrative callers may match on the variants.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown identifier or wrong password
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account is locked until the given Unix timestamp
    #[error("account locked until {locked_until}")]
    AccountLocked { locked_until: i64 },

    /// Account exists but has been deactivated
    #[error("account inactive")]
    AccountInactive,

    #[error(transparent)]
    Internal(#[from] InternalError),
}
