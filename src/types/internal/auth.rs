use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer tag
    pub iss: String,

    /// Subject (user id)
    pub sub: String,

    /// Audience
    pub aud: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not valid before (Unix timestamp)
    pub nbf: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Unique token id
    pub jti: String,
}

/// Public identity of an authenticated user
///
/// Carries everything a caller may see about the subject. The password hash
/// never leaves the user store through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_verified: bool,
}

impl From<&crate::types::db::user::Model> for Identity {
    fn from(user: &crate::types::db::user::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            is_verified: user.is_verified,
        }
    }
}
