use poem_openapi::Object;

/// Request to create a new user account
#[derive(Object, Debug)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    /// Plaintext password; hashed before persistence, never stored
    pub password: String,
}

/// Response for a created entity
#[derive(Object, Debug)]
pub struct CreatedResponse {
    pub id: String,
}

/// Administrative security status for one account
///
/// Admin-only surface: lock state is reported explicitly here, unlike the
/// public login endpoint.
#[derive(Object, Debug)]
pub struct SecurityStatusResponse {
    pub is_locked: bool,
    pub failed_attempts: i32,
    pub locked_until: Option<i64>,
    pub last_login: Option<i64>,
    pub is_active: bool,
    pub is_verified: bool,
}

/// Generic acknowledgement message
#[derive(Object, Debug)]
pub struct MessageResponse {
    pub message: String,
}
