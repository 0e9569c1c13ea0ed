// Common test utilities for integration tests

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use bookstash_backend::app_data::AppData;
use bookstash_backend::config::SecuritySettings;
use bookstash_backend::types::db::user;

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Security settings with short, deterministic values for tests
pub fn test_settings() -> SecuritySettings {
    SecuritySettings {
        jwt_secret: "test-secret-key-minimum-32-characters-long".to_string(),
        jwt_issuer: "bookstash".to_string(),
        jwt_audience: "bookstash-api".to_string(),
        token_lifetime_secs: 4 * 60 * 60,
        password_pepper: "test-pepper-minimum-32-characters-long!".to_string(),
        lockout_threshold: 5,
        lockout_duration_secs: 900,
        max_roles_per_user: 10,
        max_permissions_per_role: 50,
    }
}

/// Creates a migrated database and fully wired services
pub async fn setup_app() -> AppData {
    let db = setup_test_db().await;
    AppData::init(db, &test_settings())
}

/// Creates a user through the admin path and returns its record
pub async fn create_test_user(
    app: &AppData,
    username: &str,
    email: &str,
    password: &str,
) -> user::Model {
    app.admin_service
        .create_user(username, email, password, None)
        .await
        .expect("Failed to create test user")
}
