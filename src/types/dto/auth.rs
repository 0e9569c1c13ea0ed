use poem_openapi::Object;

/// Login request with username (or email) and password
#[derive(Object, Debug)]
pub struct LoginRequest {
    /// Username or email address
    pub identifier: String,

    /// Plaintext password
    pub password: String,
}

/// Successful login response carrying the bearer token
#[derive(Object, Debug)]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Seconds until the token expires
    pub expires_in: i64,
}

/// Identity information resolved from a bearer token
#[derive(Object, Debug)]
pub struct WhoAmIResponse {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub is_verified: bool,
}
