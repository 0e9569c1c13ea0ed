mod common;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use bookstash_backend::app_data::AppData;
use bookstash_backend::types::db::role_permission;
use common::{create_test_user, setup_app};

const ACTOR: &str = "admin-1";

/// Creates a user holding one role with two permissions; returns
/// (user_id, role_id, permission_ids)
async fn seed_grants(app: &AppData) -> (String, String, Vec<String>) {
    let user = create_test_user(app, "alice", "alice@example.com", "Str0ng!Pass").await;
    let role = app
        .rbac_service
        .create_role("editor", None, false, ACTOR)
        .await
        .unwrap();

    let read = app
        .rbac_service
        .create_permission("books.read", None, "read", ACTOR)
        .await
        .unwrap();
    let update = app
        .rbac_service
        .create_permission("books.update", None, "update", ACTOR)
        .await
        .unwrap();

    app.rbac_service
        .assign_permissions_to_role(&role.id, &[read.id.clone(), update.id.clone()], ACTOR)
        .await
        .unwrap();
    app.rbac_service
        .assign_roles_to_user(&user.id, &[role.id.clone()], ACTOR)
        .await
        .unwrap();

    (user.id, role.id, vec![read.id, update.id])
}

#[tokio::test]
async fn test_permissions_flow_through_roles() {
    let app = setup_app().await;
    let (user_id, _role_id, permission_ids) = seed_grants(&app).await;

    let mut effective: Vec<String> = app
        .rbac_service
        .effective_permissions(&user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    effective.sort();

    let mut expected = permission_ids;
    expected.sort();
    assert_eq!(effective, expected);
}

#[tokio::test]
async fn test_soft_deleted_role_stops_granting_but_keeps_links() {
    let app = setup_app().await;
    let (user_id, role_id, _permission_ids) = seed_grants(&app).await;

    app.rbac_service
        .soft_delete_role(&role_id, ACTOR)
        .await
        .unwrap();

    let effective = app
        .rbac_service
        .effective_permissions(&user_id)
        .await
        .unwrap();
    assert!(effective.is_empty());

    // The association rows survive the soft delete
    let links = role_permission::Entity::find()
        .filter(role_permission::Column::RoleId.eq(role_id.clone()))
        .all(&app.db)
        .await
        .unwrap();
    assert_eq!(links.len(), 2);

    // Restoring the role brings the grants back
    app.rbac_service.restore_role(&role_id, ACTOR).await.unwrap();
    let effective = app
        .rbac_service
        .effective_permissions(&user_id)
        .await
        .unwrap();
    assert_eq!(effective.len(), 2);
}

#[tokio::test]
async fn test_soft_deleted_permission_is_filtered_out() {
    let app = setup_app().await;
    let (user_id, _role_id, permission_ids) = seed_grants(&app).await;

    app.rbac_service
        .soft_delete_permission(&permission_ids[0], ACTOR)
        .await
        .unwrap();

    let effective: Vec<String> = app
        .rbac_service
        .effective_permissions(&user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();

    assert_eq!(effective, vec![permission_ids[1].clone()]);
}

#[tokio::test]
async fn test_user_without_roles_has_no_permissions() {
    let app = setup_app().await;
    let user = create_test_user(&app, "bob", "bob@example.com", "Str0ng!Pass").await;

    let effective = app
        .rbac_service
        .effective_permissions(&user.id)
        .await
        .unwrap();
    assert!(effective.is_empty());
}
