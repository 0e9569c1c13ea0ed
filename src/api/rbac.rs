use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use sea_orm::ActiveEnum;
use std::sync::Arc;

use super::BearerAuth;
use crate::errors::api::AdminApiError;
use crate::services::{AuthService, RbacService};
use crate::types::dto::admin::{CreatedResponse, MessageResponse};
use crate::types::dto::rbac::{
    AssignPermissionsRequest, AssignRolesRequest, CreatePermissionRequest, CreateRoleRequest,
    PermissionView,
};
use crate::types::internal::Identity;

/// Role and permission assignment endpoints
pub struct RbacApi {
    rbac_service: Arc<RbacService>,
    auth_service: Arc<AuthService>,
}

impl RbacApi {
    pub fn new(rbac_service: Arc<RbacService>, auth_service: Arc<AuthService>) -> Self {
        Self {
            rbac_service,
            auth_service,
        }
    }

    async fn caller(&self, auth: &BearerAuth) -> Result<Identity, AdminApiError> {
        Ok(self.auth_service.verify_token(&auth.0.token).await?)
    }
}

#[derive(Tags)]
enum RbacTags {
    /// Role and permission management
    Rbac,
}

#[OpenApi(prefix_path = "/rbac")]
impl RbacApi {
    /// Replace the full role set of a user
    #[oai(
        path = "/users/:user_id/roles",
        method = "put",
        tag = "RbacTags::Rbac"
    )]
    async fn assign_roles(
        &self,
        auth: BearerAuth,
        user_id: Path<String>,
        body: Json<AssignRolesRequest>,
    ) -> Result<Json<MessageResponse>, AdminApiError> {
        let caller = self.caller(&auth).await?;

        self.rbac_service
            .assign_roles_to_user(&user_id.0, &body.role_ids, &caller.id)
            .await?;

        Ok(Json(MessageResponse {
            message: "Roles assigned".to_string(),
        }))
    }

    /// Replace the full permission set of a role
    #[oai(
        path = "/roles/:role_id/permissions",
        method = "put",
        tag = "RbacTags::Rbac"
    )]
    async fn assign_permissions(
        &self,
        auth: BearerAuth,
        role_id: Path<String>,
        body: Json<AssignPermissionsRequest>,
    ) -> Result<Json<MessageResponse>, AdminApiError> {
        let caller = self.caller(&auth).await?;

        self.rbac_service
            .assign_permissions_to_role(&role_id.0, &body.permission_ids, &caller.id)
            .await?;

        Ok(Json(MessageResponse {
            message: "Permissions assigned".to_string(),
        }))
    }

    /// Permissions effectively granted to a user
    ///
    /// Filters out soft-deleted roles and permissions.
    #[oai(
        path = "/users/:user_id/permissions",
        method = "get",
        tag = "RbacTags::Rbac"
    )]
    async fn effective_permissions(
        &self,
        auth: BearerAuth,
        user_id: Path<String>,
    ) -> Result<Json<Vec<PermissionView>>, AdminApiError> {
        self.caller(&auth).await?;

        let permissions = self.rbac_service.effective_permissions(&user_id.0).await?;

        Ok(Json(
            permissions
                .into_iter()
                .map(|p| PermissionView {
                    id: p.id,
                    name: p.name,
                    action: p.action.to_value(),
                })
                .collect(),
        ))
    }

    /// Create a role
    #[oai(path = "/roles", method = "post", tag = "RbacTags::Rbac")]
    async fn create_role(
        &self,
        auth: BearerAuth,
        body: Json<CreateRoleRequest>,
    ) -> Result<Json<CreatedResponse>, AdminApiError> {
        let caller = self.caller(&auth).await?;

        let role = self
            .rbac_service
            .create_role(
                &body.name,
                body.description.clone(),
                body.is_default.unwrap_or(false),
                &caller.id,
            )
            .await?;

        Ok(Json(CreatedResponse { id: role.id }))
    }

    /// Create a permission
    #[oai(path = "/permissions", method = "post", tag = "RbacTags::Rbac")]
    async fn create_permission(
        &self,
        auth: BearerAuth,
        body: Json<CreatePermissionRequest>,
    ) -> Result<Json<CreatedResponse>, AdminApiError> {
        let caller = self.caller(&auth).await?;

        let permission = self
            .rbac_service
            .create_permission(
                &body.name,
                body.description.clone(),
                &body.action,
                &caller.id,
            )
            .await?;

        Ok(Json(CreatedResponse { id: permission.id }))
    }

    /// Soft-delete a role; its assignments stay but stop granting anything
    #[oai(path = "/roles/:role_id", method = "delete", tag = "RbacTags::Rbac")]
    async fn delete_role(
        &self,
        auth: BearerAuth,
        role_id: Path<String>,
    ) -> Result<Json<MessageResponse>, AdminApiError> {
        let caller = self.caller(&auth).await?;

        self.rbac_service
            .soft_delete_role(&role_id.0, &caller.id)
            .await?;

        Ok(Json(MessageResponse {
            message: "Role deleted".to_string(),
        }))
    }

    /// Restore a soft-deleted role
    #[oai(
        path = "/roles/:role_id/restore",
        method = "post",
        tag = "RbacTags::Rbac"
    )]
    async fn restore_role(
        &self,
        auth: BearerAuth,
        role_id: Path<String>,
    ) -> Result<Json<MessageResponse>, AdminApiError> {
        let caller = self.caller(&auth).await?;

        self.rbac_service
            .restore_role(&role_id.0, &caller.id)
            .await?;

        Ok(Json(MessageResponse {
            message: "Role restored".to_string(),
        }))
    }

    /// Soft-delete a permission
    #[oai(
        path = "/permissions/:permission_id",
        method = "delete",
        tag = "RbacTags::Rbac"
    )]
    async fn delete_permission(
        &self,
        auth: BearerAuth,
        permission_id: Path<String>,
    ) -> Result<Json<MessageResponse>, AdminApiError> {
        let caller = self.caller(&auth).await?;

        self.rbac_service
            .soft_delete_permission(&permission_id.0, &caller.id)
            .await?;

        Ok(Json(MessageResponse {
            message: "Permission deleted".to_string(),
        }))
    }

    /// Restore a soft-deleted permission
    #[oai(
        path = "/permissions/:permission_id/restore",
        method = "post",
        tag = "RbacTags::Rbac"
    )]
    async fn restore_permission(
        &self,
        auth: BearerAuth,
        permission_id: Path<String>,
    ) -> Result<Json<MessageResponse>, AdminApiError> {
        let caller = self.caller(&auth).await?;

        self.rbac_service
            .restore_permission(&permission_id.0, &caller.id)
            .await?;

        Ok(Json(MessageResponse {
            message: "Permission restored".to_string(),
        }))
    }
}
