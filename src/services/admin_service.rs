use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::config::SecuritySettings;
use crate::errors::{InternalError, RbacError};
use crate::services::{validation, LockoutPolicy, PasswordHasher};
use crate::stores::{user_store::NewUser, RoleStore, UserStore};
use crate::types::db::user;
use crate::types::internal::SecurityStatus;

/// Administrative service for account management
///
/// Creation hashes the plaintext before anything is persisted and attaches
/// the default roles; unlock and security status are the admin-only window
/// into the lockout state.
pub struct AdminService {
    db: DatabaseConnection,
    hasher: PasswordHasher,
    lockout: LockoutPolicy,
}

impl AdminService {
    pub fn new(db: DatabaseConnection, settings: &SecuritySettings) -> Self {
        Self {
            db,
            hasher: PasswordHasher::new(settings.password_pepper.clone()),
            lockout: LockoutPolicy::new(
                settings.lockout_threshold,
                settings.lockout_duration_secs,
            ),
        }
    }

    /// Create a user account
    ///
    /// Validates username/email/password, enforces uniqueness among
    /// non-deleted users, hashes the password and attaches default roles,
    /// all in one transaction.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        actor_id: Option<&str>,
    ) -> Result<user::Model, RbacError> {
        let username = validation::validate_username(username)?;
        let email = validation::validate_email(email)?;
        validation::validate_password(password)?;

        let password_hash = self.hasher.hash(password)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::database("begin_create_user", e))?;

        if let Some(field) = UserStore::find_taken_field(&txn, &username, &email).await? {
            return Err(RbacError::IntegrityConflict { field });
        }

        let now = Utc::now().timestamp();
        let created = UserStore::insert(
            &txn,
            NewUser {
                id: Uuid::new_v4().to_string(),
                username,
                email,
                password_hash,
                created_by: actor_id.map(str::to_string),
            },
            now,
        )
        .await
        .map_err(|e| RbacError::insert_conflict("username", e))?;

        // New accounts start with every default role
        let default_roles = RoleStore::find_default(&txn).await?;
        if !default_roles.is_empty() {
            let role_ids: Vec<String> = default_roles.into_iter().map(|r| r.id).collect();
            RoleStore::replace_user_roles(
                &txn,
                &created.id,
                &role_ids,
                actor_id.unwrap_or(&created.id),
                now,
            )
            .await?;
        }

        txn.commit()
            .await
            .map_err(|e| InternalError::database("commit_create_user", e))?;

        tracing::info!(user_id = %created.id, "created user account");
        Ok(created)
    }

    /// Administrative unlock: clears the lock and resets the counter
    pub async fn unlock_account(&self, user_id: &str, actor_id: &str) -> Result<(), RbacError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::database("begin_unlock_account", e))?;

        UserStore::find_active_by_id(&txn, user_id)
            .await?
            .ok_or_else(|| RbacError::not_found("User", vec![user_id.to_string()]))?;

        UserStore::clear_lock(&txn, user_id, Some(actor_id), Utc::now().timestamp()).await?;

        txn.commit()
            .await
            .map_err(|e| InternalError::database("commit_unlock_account", e))?;

        tracing::info!(user_id, actor_id, "account unlocked by administrator");
        Ok(())
    }

    /// Security status for one account; admin-only, never the password hash
    pub async fn get_security_status(&self, user_id: &str) -> Result<SecurityStatus, RbacError> {
        let user = UserStore::find_active_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| RbacError::not_found("User", vec![user_id.to_string()]))?;

        Ok(SecurityStatus {
            is_locked: self.lockout.is_locked(&user, Utc::now()),
            failed_attempts: user.failed_login_attempts,
            locked_until: user.locked_until,
            last_login: user.last_login,
            is_active: user.is_active,
            is_verified: user.is_verified,
        })
    }

    /// Default deletion: soft, reversible, hidden from lookups
    pub async fn soft_delete_user(&self, user_id: &str, actor_id: &str) -> Result<(), RbacError> {
        UserStore::find_active_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| RbacError::not_found("User", vec![user_id.to_string()]))?;

        UserStore::soft_delete(&self.db, user_id, actor_id, Utc::now().timestamp()).await?;
        tracing::info!(user_id, actor_id, "soft-deleted user");
        Ok(())
    }

    pub async fn restore_user(&self, user_id: &str, actor_id: &str) -> Result<(), RbacError> {
        let user = UserStore::find_any_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| RbacError::not_found("User", vec![user_id.to_string()]))?;
        if user.deleted_at.is_none() {
            return Err(RbacError::validation("user_id", "user is not deleted"));
        }

        UserStore::restore(&self.db, user_id, actor_id, Utc::now().timestamp()).await?;
        tracing::info!(user_id, actor_id, "restored user");
        Ok(())
    }

    /// Physical removal; association rows cascade with the user
    pub async fn hard_delete_user(&self, user_id: &str, actor_id: &str) -> Result<(), RbacError> {
        UserStore::find_any_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| RbacError::not_found("User", vec![user_id.to_string()]))?;

        UserStore::hard_delete(&self.db, user_id).await?;
        tracing::warn!(user_id, actor_id, "hard-deleted user");
        Ok(())
    }
}
