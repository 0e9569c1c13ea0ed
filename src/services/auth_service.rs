use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::sync::Arc;

use crate::config::SecuritySettings;
use crate::errors::{AuthError, InternalError, TokenError};
use crate::services::{LockoutPolicy, PasswordHasher, TokenService};
use crate::stores::UserStore;
use crate::types::db::user;
use crate::types::internal::Identity;

/// How often a conflicting concurrent counter update is retried before the
/// attempt is abandoned
const COUNTER_UPDATE_RETRIES: u32 = 3;

/// Result of a successful authentication
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access_token: String,
    pub expires_in: i64,
    pub identity: Identity,
}

/// Authentication service orchestrating lookup, lockout, verification and
/// token issuance
///
/// Each attempt runs inside one transaction: lockout check happens before
/// password verification, which happens before any counter mutation, and a
/// persistence failure rolls the whole attempt back.
pub struct AuthService {
    db: DatabaseConnection,
    hasher: PasswordHasher,
    lockout: LockoutPolicy,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        db: DatabaseConnection,
        settings: &SecuritySettings,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            db,
            hasher: PasswordHasher::new(settings.password_pepper.clone()),
            lockout: LockoutPolicy::new(
                settings.lockout_threshold,
                settings.lockout_duration_secs,
            ),
            tokens,
        }
    }

    /// Authenticate by username or email
    ///
    /// Public callers must fold `AccountLocked` and `AccountInactive` into
    /// the same response as `InvalidCredentials`; the distinction exists for
    /// administrative callers and tests only.
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        self.authenticate_at(identifier, password, Utc::now()).await
    }

    /// Authenticate with an explicit clock
    pub async fn authenticate_at(
        &self,
        identifier: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, AuthError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::database("begin_authenticate", e))?;

        let Some(mut user) = UserStore::find_active_by_identifier(&txn, identifier).await? else {
            // Do not reveal whether the identifier exists
            tracing::debug!("login failed: unknown identifier");
            return Err(AuthError::InvalidCredentials);
        };

        // Lazy auto-unlock: an expired lock clears before anything else so
        // the rest of the attempt sees a clean counter.
        if self.lockout.lock_expired(&user, now) {
            UserStore::clear_lock(&txn, &user.id, None, now.timestamp()).await?;
            user.failed_login_attempts = 0;
            user.locked_until = None;
        }

        if self.lockout.is_locked(&user, now) {
            let locked_until = user.locked_until.unwrap_or_default();
            tracing::debug!(user_id = %user.id, "login refused: account locked");
            txn.commit()
                .await
                .map_err(|e| InternalError::database("commit_authenticate", e))?;
            return Err(AuthError::AccountLocked { locked_until });
        }

        if !user.is_active {
            tracing::debug!(user_id = %user.id, "login refused: account inactive");
            txn.commit()
                .await
                .map_err(|e| InternalError::database("commit_authenticate", e))?;
            return Err(AuthError::AccountInactive);
        }

        if !self.hasher.verify(password, &user.password_hash) {
            let locked = self.persist_failure(&txn, &user, now).await?;
            txn.commit()
                .await
                .map_err(|e| InternalError::database("commit_authenticate", e))?;
            if locked {
                tracing::warn!(user_id = %user.id, "account locked after repeated failures");
            } else {
                tracing::debug!(user_id = %user.id, "login failed: wrong password");
            }
            return Err(AuthError::InvalidCredentials);
        }

        UserStore::record_success(&txn, &user.id, now.timestamp()).await?;
        let issued = self
            .tokens
            .issue_at(&user.id, now)
            .map_err(AuthError::Internal)?;
        txn.commit()
            .await
            .map_err(|e| InternalError::database("commit_authenticate", e))?;

        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(LoginOutcome {
            access_token: issued.token,
            expires_in: self.tokens.lifetime_secs(),
            identity: Identity::from(&user),
        })
    }

    /// Persist a failed-attempt transition, serialized against concurrent
    /// attempts on the same row
    ///
    /// Returns whether this failure locked the account.
    async fn persist_failure(
        &self,
        txn: &sea_orm::DatabaseTransaction,
        user: &user::Model,
        now: DateTime<Utc>,
    ) -> Result<bool, InternalError> {
        let mut expected = user.failed_login_attempts;

        for _ in 0..COUNTER_UPDATE_RETRIES {
            let outcome = self.lockout.after_failure(expected, now);
            let updated = UserStore::record_failure(
                txn,
                &user.id,
                expected,
                outcome.failed_login_attempts,
                outcome.locked_until,
                now.timestamp(),
            )
            .await?;

            if updated {
                return Ok(outcome.locked_until.is_some());
            }

            // Another attempt moved the counter first; re-read and retry so
            // this failure still counts toward the threshold.
            let fresh = UserStore::find_active_by_id(txn, &user.id)
                .await?
                .ok_or_else(|| {
                    InternalError::database(
                        "record_failure",
                        sea_orm::DbErr::RecordNotFound(user.id.clone()),
                    )
                })?;
            expected = fresh.failed_login_attempts;
        }

        Err(InternalError::database(
            "record_failure",
            sea_orm::DbErr::Custom("failed-attempt counter update kept conflicting".to_string()),
        ))
    }

    /// Verify a bearer token and resolve its subject to a live user
    ///
    /// Performs no mutation. A deleted or deactivated subject yields
    /// `UserNotFound` so stale tokens stop working the moment the account
    /// goes away.
    pub async fn verify_token(&self, token: &str) -> Result<Identity, TokenError> {
        let claims = self.tokens.verify(token)?;

        let user = UserStore::find_active_by_id(&self.db, &claims.sub)
            .await
            .map_err(TokenError::Internal)?
            .ok_or(TokenError::UserNotFound)?;

        if !user.is_active {
            return Err(TokenError::UserNotFound);
        }

        Ok(Identity::from(&user))
    }

    pub fn token_service(&self) -> Arc<TokenService> {
        self.tokens.clone()
    }
}
