use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use super::BearerAuth;
use crate::errors::api::AdminApiError;
use crate::services::{AdminService, AuthService};
use crate::types::dto::admin::{
    CreateUserRequest, CreatedResponse, MessageResponse, SecurityStatusResponse,
};
use crate::types::internal::Identity;

/// Administrative API endpoints
///
/// Every operation requires an authenticated caller; the caller's id is
/// recorded as the acting administrator on mutations.
pub struct AdminApi {
    admin_service: Arc<AdminService>,
    auth_service: Arc<AuthService>,
}

impl AdminApi {
    pub fn new(admin_service: Arc<AdminService>, auth_service: Arc<AuthService>) -> Self {
        Self {
            admin_service,
            auth_service,
        }
    }

    async fn caller(&self, auth: &BearerAuth) -> Result<Identity, AdminApiError> {
        Ok(self.auth_service.verify_token(&auth.0.token).await?)
    }
}

#[derive(Tags)]
enum AdminTags {
    /// Administrative endpoints
    Admin,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// Create a user account
    #[oai(path = "/users", method = "post", tag = "AdminTags::Admin")]
    async fn create_user(
        &self,
        auth: BearerAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<Json<CreatedResponse>, AdminApiError> {
        let caller = self.caller(&auth).await?;

        let created = self
            .admin_service
            .create_user(&body.username, &body.email, &body.password, Some(&caller.id))
            .await?;

        Ok(Json(CreatedResponse { id: created.id }))
    }

    /// Security status of one account (admin-only; reveals lock state)
    #[oai(
        path = "/users/:user_id/security-status",
        method = "get",
        tag = "AdminTags::Admin"
    )]
    async fn security_status(
        &self,
        auth: BearerAuth,
        user_id: Path<String>,
    ) -> Result<Json<SecurityStatusResponse>, AdminApiError> {
        self.caller(&auth).await?;

        let status = self.admin_service.get_security_status(&user_id.0).await?;

        Ok(Json(SecurityStatusResponse {
            is_locked: status.is_locked,
            failed_attempts: status.failed_attempts,
            locked_until: status.locked_until,
            last_login: status.last_login,
            is_active: status.is_active,
            is_verified: status.is_verified,
        }))
    }

    /// Manually unlock a locked account
    #[oai(
        path = "/users/:user_id/unlock",
        method = "post",
        tag = "AdminTags::Admin"
    )]
    async fn unlock(
        &self,
        auth: BearerAuth,
        user_id: Path<String>,
    ) -> Result<Json<MessageResponse>, AdminApiError> {
        let caller = self.caller(&auth).await?;

        self.admin_service
            .unlock_account(&user_id.0, &caller.id)
            .await?;

        Ok(Json(MessageResponse {
            message: "Account unlocked".to_string(),
        }))
    }

    /// Soft-delete a user account
    #[oai(path = "/users/:user_id", method = "delete", tag = "AdminTags::Admin")]
    async fn delete_user(
        &self,
        auth: BearerAuth,
        user_id: Path<String>,
    ) -> Result<Json<MessageResponse>, AdminApiError> {
        let caller = self.caller(&auth).await?;

        self.admin_service
            .soft_delete_user(&user_id.0, &caller.id)
            .await?;

        Ok(Json(MessageResponse {
            message: "User deleted".to_string(),
        }))
    }

    /// Restore a soft-deleted user account
    #[oai(
        path = "/users/:user_id/restore",
        method = "post",
        tag = "AdminTags::Admin"
    )]
    async fn restore_user(
        &self,
        auth: BearerAuth,
        user_id: Path<String>,
    ) -> Result<Json<MessageResponse>, AdminApiError> {
        let caller = self.caller(&auth).await?;

        self.admin_service
            .restore_user(&user_id.0, &caller.id)
            .await?;

        Ok(Json(MessageResponse {
            message: "User restored".to_string(),
        }))
    }
}
