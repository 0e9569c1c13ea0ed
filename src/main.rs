use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::{Database, DatabaseConnection};

use bookstash_backend::api::{AdminApi, AuthApi, HealthApi, RbacApi};
use bookstash_backend::app_data::AppData;
use bookstash_backend::config::{self, SecuritySettings};
use bookstash_backend::errors::RbacError;
use migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    config::logging::init_logging().expect("Failed to initialize logging");

    let settings = SecuritySettings::from_env().expect("Invalid security configuration");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://bookstash.db?mode=rwc".to_string());

    let db: DatabaseConnection = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database: {database_url}");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Database migrations completed");

    let app_data = AppData::init(db, &settings);

    // Seed the initial administrator when configured; without it a fresh
    // deployment has no account that can reach the admin endpoints.
    if let (Ok(username), Ok(email), Ok(password)) = (
        std::env::var("BOOTSTRAP_ADMIN_USERNAME"),
        std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
        std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
    ) {
        match app_data
            .admin_service
            .create_user(&username, &email, &password, None)
            .await
        {
            Ok(user) => tracing::info!(user_id = %user.id, "bootstrap administrator created"),
            Err(RbacError::IntegrityConflict { .. }) => {
                tracing::info!("bootstrap administrator already exists, skipping");
            }
            Err(e) => tracing::error!("failed to create bootstrap administrator: {e}"),
        }
    }

    let auth_api = AuthApi::new(app_data.auth_service.clone());
    let admin_api = AdminApi::new(
        app_data.admin_service.clone(),
        app_data.auth_service.clone(),
    );
    let rbac_api = RbacApi::new(app_data.rbac_service.clone(), app_data.auth_service.clone());

    let api_service = OpenApiService::new(
        (HealthApi, auth_api, admin_api, rbac_api),
        "Bookstash Backend",
        env!("CARGO_PKG_VERSION"),
    )
    .server("http://localhost:3000/api");

    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!("Starting server on http://0.0.0.0:3000");

    Server::new(TcpListener::bind("0.0.0.0:3000")).run(app).await
}
