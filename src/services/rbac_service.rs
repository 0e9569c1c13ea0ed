use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::config::SecuritySettings;
use crate::errors::{InternalError, RbacError};
use crate::services::validation;
use crate::stores::{
    permission_store::NewPermission, role_store::NewRole, PermissionStore, RoleStore, UserStore,
};
use crate::types::db::permission::{self, PermissionAction};
use crate::types::db::role;

/// RBAC assignment engine
///
/// Maintains the user↔role and role↔permission relations. Cardinality and
/// duplicate validation run before any persistence; both assignment
/// operations replace the full set atomically and are idempotent.
pub struct RbacService {
    db: DatabaseConnection,
    max_roles_per_user: usize,
    max_permissions_per_role: usize,
}

impl RbacService {
    pub fn new(db: DatabaseConnection, settings: &SecuritySettings) -> Self {
        Self {
            db,
            max_roles_per_user: settings.max_roles_per_user,
            max_permissions_per_role: settings.max_permissions_per_role,
        }
    }

    /// Replace the full role set of a user
    pub async fn assign_roles_to_user(
        &self,
        user_id: &str,
        role_ids: &[String],
        actor_id: &str,
    ) -> Result<(), RbacError> {
        Self::check_id_set("role_ids", role_ids, self.max_roles_per_user)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::database("begin_assign_roles", e))?;

        UserStore::find_active_by_id(&txn, user_id)
            .await?
            .ok_or_else(|| RbacError::not_found("User", vec![user_id.to_string()]))?;

        let roles = RoleStore::find_active_by_ids(&txn, role_ids).await?;
        if roles.len() != role_ids.len() {
            return Err(Self::missing_ids_error(
                "Role",
                role_ids,
                roles.iter().map(|r| r.id.as_str()),
            ));
        }

        let now = Utc::now().timestamp();
        RoleStore::replace_user_roles(&txn, user_id, role_ids, actor_id, now).await?;

        txn.commit()
            .await
            .map_err(|e| InternalError::database("commit_assign_roles", e))?;

        tracing::info!(
            user_id,
            actor_id,
            count = role_ids.len(),
            "replaced user role set"
        );
        Ok(())
    }

    /// Replace the full permission set of a role
    pub async fn assign_permissions_to_role(
        &self,
        role_id: &str,
        permission_ids: &[String],
        actor_id: &str,
    ) -> Result<(), RbacError> {
        Self::check_id_set(
            "permission_ids",
            permission_ids,
            self.max_permissions_per_role,
        )?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::database("begin_assign_permissions", e))?;

        RoleStore::find_active_by_id(&txn, role_id)
            .await?
            .ok_or_else(|| RbacError::not_found("Role", vec![role_id.to_string()]))?;

        let permissions = PermissionStore::find_active_by_ids(&txn, permission_ids).await?;
        if permissions.len() != permission_ids.len() {
            return Err(Self::missing_ids_error(
                "Permission",
                permission_ids,
                permissions.iter().map(|p| p.id.as_str()),
            ));
        }

        let now = Utc::now().timestamp();
        PermissionStore::replace_role_permissions(&txn, role_id, permission_ids, actor_id, now)
            .await?;

        txn.commit()
            .await
            .map_err(|e| InternalError::database("commit_assign_permissions", e))?;

        tracing::info!(
            role_id,
            actor_id,
            count = permission_ids.len(),
            "replaced role permission set"
        );
        Ok(())
    }

    /// Permissions effectively granted to a user
    ///
    /// The consuming authorization check: associations are filtered through
    /// non-deleted roles and non-deleted permissions only, so soft-deleted
    /// entities stop granting anything without losing their links.
    pub async fn effective_permissions(
        &self,
        user_id: &str,
    ) -> Result<Vec<permission::Model>, RbacError> {
        UserStore::find_active_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| RbacError::not_found("User", vec![user_id.to_string()]))?;

        let linked_role_ids = RoleStore::role_ids_for_user(&self.db, user_id).await?;
        let active_roles = RoleStore::find_active_by_ids(&self.db, &linked_role_ids).await?;
        let active_role_ids: Vec<String> = active_roles.into_iter().map(|r| r.id).collect();

        let permission_ids =
            PermissionStore::permission_ids_for_roles(&self.db, &active_role_ids).await?;
        let permissions = PermissionStore::find_active_by_ids(&self.db, &permission_ids).await?;

        Ok(permissions)
    }

    /// Create a role; unique name among non-deleted roles
    pub async fn create_role(
        &self,
        name: &str,
        description: Option<String>,
        is_default: bool,
        actor_id: &str,
    ) -> Result<role::Model, RbacError> {
        let name = validation::validate_name(name, "name")?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::database("begin_create_role", e))?;

        if RoleStore::find_active_by_name(&txn, &name).await?.is_some() {
            return Err(RbacError::IntegrityConflict { field: "name" });
        }

        let role = RoleStore::insert(
            &txn,
            NewRole {
                id: Uuid::new_v4().to_string(),
                name,
                description,
                is_default,
                created_by: Some(actor_id.to_string()),
            },
            Utc::now().timestamp(),
        )
        .await
        .map_err(|e| RbacError::insert_conflict("name", e))?;

        txn.commit()
            .await
            .map_err(|e| InternalError::database("commit_create_role", e))?;

        tracing::info!(role_id = %role.id, actor_id, "created role");
        Ok(role)
    }

    /// Create a permission; unique name, action from the closed enumeration
    pub async fn create_permission(
        &self,
        name: &str,
        description: Option<String>,
        action: &str,
        actor_id: &str,
    ) -> Result<permission::Model, RbacError> {
        let name = validation::validate_name(name, "name")?;
        let action = Self::parse_action(action)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::database("begin_create_permission", e))?;

        if PermissionStore::find_active_by_name(&txn, &name)
            .await?
            .is_some()
        {
            return Err(RbacError::IntegrityConflict { field: "name" });
        }

        let permission = PermissionStore::insert(
            &txn,
            NewPermission {
                id: Uuid::new_v4().to_string(),
                name,
                description,
                action,
                created_by: Some(actor_id.to_string()),
            },
            Utc::now().timestamp(),
        )
        .await
        .map_err(|e| RbacError::insert_conflict("name", e))?;

        txn.commit()
            .await
            .map_err(|e| InternalError::database("commit_create_permission", e))?;

        tracing::info!(permission_id = %permission.id, actor_id, "created permission");
        Ok(permission)
    }

    /// Soft-delete a role; existing associations stay in place but the role
    /// stops contributing to effective permissions
    pub async fn soft_delete_role(&self, role_id: &str, actor_id: &str) -> Result<(), RbacError> {
        RoleStore::find_active_by_id(&self.db, role_id)
            .await?
            .ok_or_else(|| RbacError::not_found("Role", vec![role_id.to_string()]))?;

        RoleStore::soft_delete(&self.db, role_id, actor_id, Utc::now().timestamp()).await?;
        tracing::info!(role_id, actor_id, "soft-deleted role");
        Ok(())
    }

    pub async fn restore_role(&self, role_id: &str, actor_id: &str) -> Result<(), RbacError> {
        let role = RoleStore::find_any_by_id(&self.db, role_id)
            .await?
            .ok_or_else(|| RbacError::not_found("Role", vec![role_id.to_string()]))?;
        if role.deleted_at.is_none() {
            return Err(RbacError::validation("role_id", "role is not deleted"));
        }

        RoleStore::restore(&self.db, role_id, actor_id, Utc::now().timestamp()).await?;
        tracing::info!(role_id, actor_id, "restored role");
        Ok(())
    }

    pub async fn soft_delete_permission(
        &self,
        permission_id: &str,
        actor_id: &str,
    ) -> Result<(), RbacError> {
        PermissionStore::find_active_by_id(&self.db, permission_id)
            .await?
            .ok_or_else(|| RbacError::not_found("Permission", vec![permission_id.to_string()]))?;

        PermissionStore::soft_delete(&self.db, permission_id, actor_id, Utc::now().timestamp())
            .await?;
        tracing::info!(permission_id, actor_id, "soft-deleted permission");
        Ok(())
    }

    pub async fn restore_permission(
        &self,
        permission_id: &str,
        actor_id: &str,
    ) -> Result<(), RbacError> {
        let permission = PermissionStore::find_any_by_id(&self.db, permission_id)
            .await?
            .ok_or_else(|| RbacError::not_found("Permission", vec![permission_id.to_string()]))?;
        if permission.deleted_at.is_none() {
            return Err(RbacError::validation(
                "permission_id",
                "permission is not deleted",
            ));
        }

        PermissionStore::restore(&self.db, permission_id, actor_id, Utc::now().timestamp())
            .await?;
        tracing::info!(permission_id, actor_id, "restored permission");
        Ok(())
    }

    /// Cardinality and duplicate validation, before any persistence
    fn check_id_set(
        field: &'static str,
        ids: &[String],
        max: usize,
    ) -> Result<(), RbacError> {
        if ids.len() > max {
            return Err(RbacError::validation(
                field,
                format!("at most {max} entries are allowed"),
            ));
        }

        let mut seen = std::collections::HashSet::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(id.as_str()) {
                return Err(RbacError::validation(
                    field,
                    format!("duplicate id: {id}"),
                ));
            }
        }

        Ok(())
    }

    /// Name exactly the requested ids that did not resolve
    fn missing_ids_error<'a>(
        resource: &'static str,
        requested: &[String],
        found: impl Iterator<Item = &'a str>,
    ) -> RbacError {
        let found: std::collections::HashSet<&str> = found.collect();
        let missing = requested
            .iter()
            .filter(|id| !found.contains(id.as_str()))
            .cloned()
            .collect();

        RbacError::not_found(resource, missing)
    }

    fn parse_action(action: &str) -> Result<PermissionAction, RbacError> {
        match action {
            "create" => Ok(PermissionAction::Create),
            "read" => Ok(PermissionAction::Read),
            "update" => Ok(PermissionAction::Update),
            "delete" => Ok(PermissionAction::Delete),
            "execute" => Ok(PermissionAction::Execute),
            other => Err(RbacError::validation(
                "action",
                format!("unknown action: {other}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_id_set_accepts_distinct_ids_within_limit() {
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert!(RbacService::check_id_set("role_ids", &ids, 10).is_ok());
        assert!(RbacService::check_id_set("role_ids", &[], 10).is_ok());
    }

    #[test]
    fn test_check_id_set_rejects_duplicates() {
        let ids = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        match RbacService::check_id_set("role_ids", &ids, 10) {
            Err(RbacError::Validation { field, message }) => {
                assert_eq!(field, "role_ids");
                assert!(message.contains('a'));
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_check_id_set_rejects_oversized_sets() {
        let ids: Vec<String> = (0..11).map(|i| i.to_string()).collect();
        match RbacService::check_id_set("role_ids", &ids, 10) {
            Err(RbacError::Validation { field, .. }) => assert_eq!(field, "role_ids"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_ids_error_names_exactly_the_missing() {
        let requested = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let found = ["a", "c"];

        match RbacService::missing_ids_error("Role", &requested, found.into_iter()) {
            RbacError::NotFound {
                resource,
                missing_ids,
            } => {
                assert_eq!(resource, "Role");
                assert_eq!(missing_ids, vec!["b".to_string()]);
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_action_covers_enumeration() {
        assert!(matches!(
            RbacService::parse_action("create"),
            Ok(PermissionAction::Create)
        ));
        assert!(matches!(
            RbacService::parse_action("execute"),
            Ok(PermissionAction::Execute)
        ));
        assert!(RbacService::parse_action("browse").is_err());
    }
}
