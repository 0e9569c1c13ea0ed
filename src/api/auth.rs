use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use super::BearerAuth;
use crate::errors::api::AuthApiError;
use crate::services::AuthService;
use crate::types::dto::auth::{LoginRequest, TokenResponse, WhoAmIResponse};

/// Authentication API endpoints
pub struct AuthApi {
    auth_service: Arc<AuthService>,
}

impl AuthApi {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }
}

#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with username or email and password
    ///
    /// The response never distinguishes unknown accounts, wrong passwords,
    /// locked accounts or deactivated accounts.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthApiError> {
        let outcome = self
            .auth_service
            .authenticate(&body.identifier, &body.password)
            .await?;

        Ok(Json(TokenResponse {
            access_token: outcome.access_token,
            token_type: "Bearer".to_string(),
            expires_in: outcome.expires_in,
        }))
    }

    /// Resolve the bearer token to the caller's identity
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, auth: BearerAuth) -> Result<Json<WhoAmIResponse>, AuthApiError> {
        let identity = self.auth_service.verify_token(&auth.0.token).await?;

        Ok(Json(WhoAmIResponse {
            user_id: identity.id,
            username: identity.username,
            email: identity.email,
            is_verified: identity.is_verified,
        }))
    }
}
