use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::SecuritySettings;
use crate::services::{AdminService, AuthService, RbacService, TokenService};

/// Centralized application data following the main-owned services pattern
///
/// All services are created once from the database connection and the
/// security settings, then shared across the API controllers. No
/// process-wide singletons; everything is injected from here.
pub struct AppData {
    pub db: DatabaseConnection,
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub rbac_service: Arc<RbacService>,
    pub admin_service: Arc<AdminService>,
}

impl AppData {
    /// Wire up all services
    ///
    /// The database should be connected and migrated before calling this.
    pub fn init(db: DatabaseConnection, settings: &SecuritySettings) -> Self {
        tracing::debug!("Initializing AppData");

        let token_service = Arc::new(TokenService::new(settings));
        let auth_service = Arc::new(AuthService::new(
            db.clone(),
            settings,
            token_service.clone(),
        ));
        let rbac_service = Arc::new(RbacService::new(db.clone(), settings));
        let admin_service = Arc::new(AdminService::new(db.clone(), settings));

        Self {
            db,
            token_service,
            auth_service,
            rbac_service,
            admin_service,
        }
    }
}
