use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};

use crate::errors::InternalError;
use crate::types::db::user::{self, ActiveModel, Entity as User};
use crate::types::db::SoftDeletable;

/// Data required to persist a new user record
pub struct NewUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_by: Option<String>,
}

/// UserStore manages user rows, including the lockout counter columns
pub struct UserStore;

impl UserStore {
    pub async fn find_active_by_id(
        conn: &impl ConnectionTrait,
        id: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find_active()
            .filter(user::Column::Id.eq(id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_active_by_id", e))
    }

    pub async fn find_active_by_username(
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find_active()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_active_by_username", e))
    }

    pub async fn find_active_by_email(
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find_active()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_active_by_email", e))
    }

    /// Resolve a login identifier: username first, email as fallback
    pub async fn find_active_by_identifier(
        conn: &impl ConnectionTrait,
        identifier: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        if let Some(user) = Self::find_active_by_username(conn, identifier).await? {
            return Ok(Some(user));
        }
        Self::find_active_by_email(conn, identifier).await
    }

    /// Check username/email uniqueness among non-deleted users
    ///
    /// Returns the offending field name when taken.
    pub async fn find_taken_field(
        conn: &impl ConnectionTrait,
        username: &str,
        email: &str,
    ) -> Result<Option<&'static str>, InternalError> {
        if Self::find_active_by_username(conn, username).await?.is_some() {
            return Ok(Some("username"));
        }
        if Self::find_active_by_email(conn, email).await?.is_some() {
            return Ok(Some("email"));
        }
        Ok(None)
    }

    pub async fn insert(
        conn: &impl ConnectionTrait,
        new_user: NewUser,
        now: i64,
    ) -> Result<user::Model, InternalError> {
        let model = ActiveModel {
            id: Set(new_user.id),
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            is_active: Set(true),
            is_verified: Set(false),
            failed_login_attempts: Set(0),
            locked_until: Set(None),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(new_user.created_by.clone()),
            updated_by: Set(new_user.created_by),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_user", e))
    }

    /// Persist a failed-attempt transition, conditional on the counter value
    /// the caller read
    ///
    /// Returns false when a concurrent attempt already moved the counter; the
    /// caller re-reads and retries so no failure is under-counted.
    pub async fn record_failure(
        conn: &impl ConnectionTrait,
        user_id: &str,
        expected_attempts: i32,
        new_attempts: i32,
        locked_until: Option<i64>,
        now: i64,
    ) -> Result<bool, InternalError> {
        let result = User::update_many()
            .col_expr(user::Column::FailedLoginAttempts, Expr::value(new_attempts))
            .col_expr(user::Column::LockedUntil, Expr::value(locked_until))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .filter(user::Column::FailedLoginAttempts.eq(expected_attempts))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("record_failure", e))?;

        Ok(result.rows_affected == 1)
    }

    /// Reset the lockout state after a successful login and stamp last_login
    pub async fn record_success(
        conn: &impl ConnectionTrait,
        user_id: &str,
        now: i64,
    ) -> Result<(), InternalError> {
        User::update_many()
            .col_expr(user::Column::FailedLoginAttempts, Expr::value(0))
            .col_expr(user::Column::LockedUntil, Expr::value(None::<i64>))
            .col_expr(user::Column::LastLogin, Expr::value(Some(now)))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("record_success", e))?;

        Ok(())
    }

    /// Clear an expired lock without touching last_login (lazy auto-unlock
    /// and administrative unlock)
    pub async fn clear_lock(
        conn: &impl ConnectionTrait,
        user_id: &str,
        actor_id: Option<&str>,
        now: i64,
    ) -> Result<(), InternalError> {
        let mut update = User::update_many()
            .col_expr(user::Column::FailedLoginAttempts, Expr::value(0))
            .col_expr(user::Column::LockedUntil, Expr::value(None::<i64>))
            .col_expr(user::Column::UpdatedAt, Expr::value(now));

        if let Some(actor) = actor_id {
            update = update.col_expr(user::Column::UpdatedBy, Expr::value(Some(actor.to_string())));
        }

        update
            .filter(user::Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_lock", e))?;

        Ok(())
    }

    /// Soft-delete a user, hiding it from subsequent lookups
    pub async fn soft_delete(
        conn: &impl ConnectionTrait,
        user_id: &str,
        actor_id: &str,
        now: i64,
    ) -> Result<(), InternalError> {
        User::update_many()
            .col_expr(user::Column::DeletedAt, Expr::value(Some(now)))
            .col_expr(user::Column::DeletedBy, Expr::value(Some(actor_id.to_string())))
            .filter(user::Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("soft_delete_user", e))?;

        Ok(())
    }

    /// Restore a soft-deleted user
    pub async fn restore(
        conn: &impl ConnectionTrait,
        user_id: &str,
        actor_id: &str,
        now: i64,
    ) -> Result<(), InternalError> {
        User::update_many()
            .col_expr(user::Column::DeletedAt, Expr::value(None::<i64>))
            .col_expr(user::Column::DeletedBy, Expr::value(None::<String>))
            .col_expr(user::Column::UpdatedBy, Expr::value(Some(actor_id.to_string())))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("restore_user", e))?;

        Ok(())
    }

    /// Find a user regardless of soft-delete state (restore path)
    pub async fn find_any_by_id(
        conn: &impl ConnectionTrait,
        id: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_any_by_id", e))
    }

    /// Physically remove a user; association rows cascade
    pub async fn hard_delete(
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<(), InternalError> {
        User::delete_by_id(user_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("hard_delete_user", e))?;

        Ok(())
    }
}
