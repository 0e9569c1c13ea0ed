use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};

use crate::errors::InternalError;
use crate::types::db::role::{self, ActiveModel, Entity as Role};
use crate::types::db::user;
use crate::types::db::user_role::{self, Entity as UserRole};
use crate::types::db::SoftDeletable;

/// Data required to persist a new role
pub struct NewRole {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub created_by: Option<String>,
}

/// RoleStore manages role rows and the user↔role link table
pub struct RoleStore;

impl RoleStore {
    pub async fn find_active_by_id(
        conn: &impl ConnectionTrait,
        id: &str,
    ) -> Result<Option<role::Model>, InternalError> {
        Role::find_active()
            .filter(role::Column::Id.eq(id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_active_role_by_id", e))
    }

    pub async fn find_active_by_name(
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<role::Model>, InternalError> {
        Role::find_active()
            .filter(role::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_active_role_by_name", e))
    }

    pub async fn find_active_by_ids(
        conn: &impl ConnectionTrait,
        ids: &[String],
    ) -> Result<Vec<role::Model>, InternalError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Role::find_active()
            .filter(role::Column::Id.is_in(ids.iter().cloned()))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_active_roles_by_ids", e))
    }

    /// Roles attached automatically to newly created users
    pub async fn find_default(
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<role::Model>, InternalError> {
        Role::find_active()
            .filter(role::Column::IsDefault.eq(true))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_default_roles", e))
    }

    pub async fn insert(
        conn: &impl ConnectionTrait,
        new_role: NewRole,
        now: i64,
    ) -> Result<role::Model, InternalError> {
        let model = ActiveModel {
            id: Set(new_role.id),
            name: Set(new_role.name),
            description: Set(new_role.description),
            is_default: Set(new_role.is_default),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(new_role.created_by.clone()),
            updated_by: Set(new_role.created_by),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_role", e))
    }

    /// Role ids currently linked to a user (regardless of role soft-delete
    /// state; filtering is the consumer's concern)
    pub async fn role_ids_for_user(
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<Vec<String>, InternalError> {
        let links = UserRole::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("role_ids_for_user", e))?;

        Ok(links.into_iter().map(|link| link.role_id).collect())
    }

    /// Replace the entire role set of a user
    ///
    /// Delete-then-insert inside the caller's transaction, so concurrent
    /// edits can never leave a partial overwrite. Stamps the user row with
    /// the acting administrator.
    pub async fn replace_user_roles(
        conn: &impl ConnectionTrait,
        user_id: &str,
        role_ids: &[String],
        actor_id: &str,
        now: i64,
    ) -> Result<(), InternalError> {
        UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user_roles", e))?;

        if !role_ids.is_empty() {
            let links = role_ids.iter().map(|role_id| user_role::ActiveModel {
                user_id: Set(user_id.to_string()),
                role_id: Set(role_id.clone()),
                created_at: Set(now),
                created_by: Set(Some(actor_id.to_string())),
            });

            UserRole::insert_many(links)
                .exec(conn)
                .await
                .map_err(|e| InternalError::database("insert_user_roles", e))?;
        }

        user::Entity::update_many()
            .col_expr(
                user::Column::UpdatedBy,
                Expr::value(Some(actor_id.to_string())),
            )
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("stamp_user_roles_update", e))?;

        Ok(())
    }

    pub async fn soft_delete(
        conn: &impl ConnectionTrait,
        role_id: &str,
        actor_id: &str,
        now: i64,
    ) -> Result<(), InternalError> {
        Role::update_many()
            .col_expr(role::Column::DeletedAt, Expr::value(Some(now)))
            .col_expr(role::Column::DeletedBy, Expr::value(Some(actor_id.to_string())))
            .filter(role::Column::Id.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("soft_delete_role", e))?;

        Ok(())
    }

    pub async fn restore(
        conn: &impl ConnectionTrait,
        role_id: &str,
        actor_id: &str,
        now: i64,
    ) -> Result<(), InternalError> {
        Role::update_many()
            .col_expr(role::Column::DeletedAt, Expr::value(None::<i64>))
            .col_expr(role::Column::DeletedBy, Expr::value(None::<String>))
            .col_expr(role::Column::UpdatedBy, Expr::value(Some(actor_id.to_string())))
            .col_expr(role::Column::UpdatedAt, Expr::value(now))
            .filter(role::Column::Id.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("restore_role", e))?;

        Ok(())
    }

    pub async fn find_any_by_id(
        conn: &impl ConnectionTrait,
        id: &str,
    ) -> Result<Option<role::Model>, InternalError> {
        Role::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_any_role_by_id", e))
    }
}
