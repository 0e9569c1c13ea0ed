mod common;

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use bookstash_backend::errors::TokenError;
use bookstash_backend::types::db::user;
use common::{create_test_user, setup_app};

async fn login_token(app: &bookstash_backend::app_data::AppData) -> String {
    app.auth_service
        .authenticate("alice", "Str0ng!Pass")
        .await
        .expect("Login should succeed")
        .access_token
}

#[tokio::test]
async fn test_verify_token_resolves_identity() {
    let app = setup_app().await;
    let created = create_test_user(&app, "alice", "alice@example.com", "Str0ng!Pass").await;
    let token = login_token(&app).await;

    let identity = app
        .auth_service
        .verify_token(&token)
        .await
        .expect("Token should verify");

    assert_eq!(identity.id, created.id);
    assert_eq!(identity.username, "alice");
    assert_eq!(identity.email, "alice@example.com");
}

#[tokio::test]
async fn test_tampered_token_is_invalid() {
    let app = setup_app().await;
    create_test_user(&app, "alice", "alice@example.com", "Str0ng!Pass").await;
    let token = login_token(&app).await;

    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'x' { 'y' } else { 'x' });

    let result = app.auth_service.verify_token(&tampered).await;
    assert!(matches!(result, Err(TokenError::Invalid)));
}

#[tokio::test]
async fn test_token_for_soft_deleted_user_stops_resolving() {
    let app = setup_app().await;
    let created = create_test_user(&app, "alice", "alice@example.com", "Str0ng!Pass").await;
    let token = login_token(&app).await;

    app.admin_service
        .soft_delete_user(&created.id, "admin-1")
        .await
        .unwrap();

    let result = app.auth_service.verify_token(&token).await;
    assert!(matches!(result, Err(TokenError::UserNotFound)));
}

#[tokio::test]
async fn test_token_for_deactivated_user_stops_resolving() {
    let app = setup_app().await;
    let created = create_test_user(&app, "alice", "alice@example.com", "Str0ng!Pass").await;
    let token = login_token(&app).await;

    user::Entity::update_many()
        .col_expr(user::Column::IsActive, Expr::value(false))
        .filter(user::Column::Id.eq(created.id))
        .exec(&app.db)
        .await
        .unwrap();

    let result = app.auth_service.verify_token(&token).await;
    assert!(matches!(result, Err(TokenError::UserNotFound)));
}

#[tokio::test]
async fn test_verification_does_not_mutate_lockout_state() {
    let app = setup_app().await;
    let created = create_test_user(&app, "alice", "alice@example.com", "Str0ng!Pass").await;
    let token = login_token(&app).await;

    for _ in 0..2 {
        let _ = app.auth_service.authenticate("alice", "Wr0ng!Pass").await;
    }

    app.auth_service.verify_token(&token).await.unwrap();

    // Verification leaves the counters exactly as the failed logins set them
    let status = app
        .admin_service
        .get_security_status(&created.id)
        .await
        .unwrap();
    assert_eq!(status.failed_attempts, 2);
}
