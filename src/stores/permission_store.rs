use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};

use crate::errors::InternalError;
use crate::types::db::permission::{self, ActiveModel, Entity as Permission, PermissionAction};
use crate::types::db::role::{self, Entity as Role};
use crate::types::db::role_permission::{self, Entity as RolePermission};
use crate::types::db::SoftDeletable;

/// Data required to persist a new permission
pub struct NewPermission {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub action: PermissionAction,
    pub created_by: Option<String>,
}

/// PermissionStore manages permission rows and the role↔permission link table
pub struct PermissionStore;

impl PermissionStore {
    pub async fn find_active_by_id(
        conn: &impl ConnectionTrait,
        id: &str,
    ) -> Result<Option<permission::Model>, InternalError> {
        Permission::find_active()
            .filter(permission::Column::Id.eq(id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_active_permission_by_id", e))
    }

    pub async fn find_active_by_name(
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<permission::Model>, InternalError> {
        Permission::find_active()
            .filter(permission::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_active_permission_by_name", e))
    }

    pub async fn find_active_by_ids(
        conn: &impl ConnectionTrait,
        ids: &[String],
    ) -> Result<Vec<permission::Model>, InternalError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Permission::find_active()
            .filter(permission::Column::Id.is_in(ids.iter().cloned()))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_active_permissions_by_ids", e))
    }

    pub async fn insert(
        conn: &impl ConnectionTrait,
        new_permission: NewPermission,
        now: i64,
    ) -> Result<permission::Model, InternalError> {
        let model = ActiveModel {
            id: Set(new_permission.id),
            name: Set(new_permission.name),
            description: Set(new_permission.description),
            action: Set(new_permission.action),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(new_permission.created_by.clone()),
            updated_by: Set(new_permission.created_by),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_permission", e))
    }

    /// Replace the entire permission set of a role
    ///
    /// Delete-then-insert inside the caller's transaction; stamps the role
    /// row with the acting administrator.
    pub async fn replace_role_permissions(
        conn: &impl ConnectionTrait,
        role_id: &str,
        permission_ids: &[String],
        actor_id: &str,
        now: i64,
    ) -> Result<(), InternalError> {
        RolePermission::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role_permissions", e))?;

        if !permission_ids.is_empty() {
            let links = permission_ids
                .iter()
                .map(|permission_id| role_permission::ActiveModel {
                    role_id: Set(role_id.to_string()),
                    permission_id: Set(permission_id.clone()),
                    created_at: Set(now),
                    created_by: Set(Some(actor_id.to_string())),
                });

            RolePermission::insert_many(links)
                .exec(conn)
                .await
                .map_err(|e| InternalError::database("insert_role_permissions", e))?;
        }

        Role::update_many()
            .col_expr(
                role::Column::UpdatedBy,
                Expr::value(Some(actor_id.to_string())),
            )
            .col_expr(role::Column::UpdatedAt, Expr::value(now))
            .filter(role::Column::Id.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("stamp_role_permissions_update", e))?;

        Ok(())
    }

    /// Permission ids currently granted to a set of roles
    pub async fn permission_ids_for_roles(
        conn: &impl ConnectionTrait,
        role_ids: &[String],
    ) -> Result<Vec<String>, InternalError> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let links = RolePermission::find()
            .filter(role_permission::Column::RoleId.is_in(role_ids.iter().cloned()))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("permission_ids_for_roles", e))?;

        let mut ids: Vec<String> = links.into_iter().map(|link| link.permission_id).collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    pub async fn soft_delete(
        conn: &impl ConnectionTrait,
        permission_id: &str,
        actor_id: &str,
        now: i64,
    ) -> Result<(), InternalError> {
        Permission::update_many()
            .col_expr(permission::Column::DeletedAt, Expr::value(Some(now)))
            .col_expr(
                permission::Column::DeletedBy,
                Expr::value(Some(actor_id.to_string())),
            )
            .filter(permission::Column::Id.eq(permission_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("soft_delete_permission", e))?;

        Ok(())
    }

    pub async fn restore(
        conn: &impl ConnectionTrait,
        permission_id: &str,
        actor_id: &str,
        now: i64,
    ) -> Result<(), InternalError> {
        Permission::update_many()
            .col_expr(permission::Column::DeletedAt, Expr::value(None::<i64>))
            .col_expr(permission::Column::DeletedBy, Expr::value(None::<String>))
            .col_expr(
                permission::Column::UpdatedBy,
                Expr::value(Some(actor_id.to_string())),
            )
            .col_expr(permission::Column::UpdatedAt, Expr::value(now))
            .filter(permission::Column::Id.eq(permission_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("restore_permission", e))?;

        Ok(())
    }

    pub async fn find_any_by_id(
        conn: &impl ConnectionTrait,
        id: &str,
    ) -> Result<Option<permission::Model>, InternalError> {
        Permission::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_any_permission_by_id", e))
    }
}
