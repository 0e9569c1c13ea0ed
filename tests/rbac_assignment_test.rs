mod common;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use bookstash_backend::app_data::AppData;
use bookstash_backend::errors::RbacError;
use bookstash_backend::stores::RoleStore;
use bookstash_backend::types::db::{role_permission, user_role};
use common::{create_test_user, setup_app};

const ACTOR: &str = "admin-1";

async fn create_role(app: &AppData, name: &str) -> String {
    app.rbac_service
        .create_role(name, None, false, ACTOR)
        .await
        .expect("Failed to create role")
        .id
}

async fn create_permission(app: &AppData, name: &str, action: &str) -> String {
    app.rbac_service
        .create_permission(name, None, action, ACTOR)
        .await
        .expect("Failed to create permission")
        .id
}

async fn user_role_ids(app: &AppData, user_id: &str) -> Vec<String> {
    let mut ids = RoleStore::role_ids_for_user(&app.db, user_id).await.unwrap();
    ids.sort();
    ids
}

#[tokio::test]
async fn test_assign_roles_replaces_the_full_set() {
    let app = setup_app().await;
    let user = create_test_user(&app, "alice", "alice@example.com", "Str0ng!Pass").await;
    let reader = create_role(&app, "reader").await;
    let editor = create_role(&app, "editor").await;
    let admin = create_role(&app, "admin").await;

    app.rbac_service
        .assign_roles_to_user(&user.id, &[reader.clone(), editor.clone()], ACTOR)
        .await
        .unwrap();

    let mut expected = vec![reader.clone(), editor.clone()];
    expected.sort();
    assert_eq!(user_role_ids(&app, &user.id).await, expected);

    // Replace, not add: the new set wins entirely
    app.rbac_service
        .assign_roles_to_user(&user.id, &[editor.clone(), admin.clone()], ACTOR)
        .await
        .unwrap();

    let mut expected = vec![editor, admin];
    expected.sort();
    assert_eq!(user_role_ids(&app, &user.id).await, expected);
}

#[tokio::test]
async fn test_assign_roles_is_idempotent() {
    let app = setup_app().await;
    let user = create_test_user(&app, "alice", "alice@example.com", "Str0ng!Pass").await;
    let reader = create_role(&app, "reader").await;
    let editor = create_role(&app, "editor").await;

    let set = vec![reader, editor];
    app.rbac_service
        .assign_roles_to_user(&user.id, &set, ACTOR)
        .await
        .unwrap();
    let first = user_role_ids(&app, &user.id).await;

    app.rbac_service
        .assign_roles_to_user(&user.id, &set, ACTOR)
        .await
        .unwrap();
    let second = user_role_ids(&app, &user.id).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_duplicate_role_ids_fail_without_mutation() {
    let app = setup_app().await;
    let user = create_test_user(&app, "alice", "alice@example.com", "Str0ng!Pass").await;
    let reader = create_role(&app, "reader").await;

    app.rbac_service
        .assign_roles_to_user(&user.id, &[reader.clone()], ACTOR)
        .await
        .unwrap();

    let result = app
        .rbac_service
        .assign_roles_to_user(&user.id, &[reader.clone(), reader.clone()], ACTOR)
        .await;

    match result {
        Err(RbacError::Validation { field, .. }) => assert_eq!(field, "role_ids"),
        other => panic!("Expected Validation error, got {other:?}"),
    }

    // Prior assignment is untouched
    assert_eq!(user_role_ids(&app, &user.id).await, vec![reader]);
}

#[tokio::test]
async fn test_missing_role_id_is_named_and_nothing_changes() {
    let app = setup_app().await;
    let user = create_test_user(&app, "alice", "alice@example.com", "Str0ng!Pass").await;
    let reader = create_role(&app, "reader").await;

    app.rbac_service
        .assign_roles_to_user(&user.id, &[reader.clone()], ACTOR)
        .await
        .unwrap();

    let ghost = "00000000-0000-0000-0000-000000000000".to_string();
    let result = app
        .rbac_service
        .assign_roles_to_user(&user.id, &[reader.clone(), ghost.clone()], ACTOR)
        .await;

    match result {
        Err(RbacError::NotFound {
            resource,
            missing_ids,
        }) => {
            assert_eq!(resource, "Role");
            assert_eq!(missing_ids, vec![ghost]);
        }
        other => panic!("Expected NotFound, got {other:?}"),
    }

    assert_eq!(user_role_ids(&app, &user.id).await, vec![reader]);
}

#[tokio::test]
async fn test_oversized_role_set_rejected_before_lookup() {
    let app = setup_app().await;
    let user = create_test_user(&app, "alice", "alice@example.com", "Str0ng!Pass").await;

    // Ids need not exist; cardinality is checked before any resolution
    let too_many: Vec<String> = (0..11).map(|i| format!("role-{i}")).collect();
    let result = app
        .rbac_service
        .assign_roles_to_user(&user.id, &too_many, ACTOR)
        .await;

    assert!(matches!(result, Err(RbacError::Validation { .. })));
}

#[tokio::test]
async fn test_assign_roles_to_unknown_user_fails() {
    let app = setup_app().await;
    let reader = create_role(&app, "reader").await;

    let result = app
        .rbac_service
        .assign_roles_to_user("no-such-user", &[reader], ACTOR)
        .await;

    match result {
        Err(RbacError::NotFound { resource, .. }) => assert_eq!(resource, "User"),
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_assignment_stamps_actor_and_timestamp() {
    let app = setup_app().await;
    let user = create_test_user(&app, "alice", "alice@example.com", "Str0ng!Pass").await;
    let reader = create_role(&app, "reader").await;

    app.rbac_service
        .assign_roles_to_user(&user.id, &[reader], ACTOR)
        .await
        .unwrap();

    let link = user_role::Entity::find()
        .filter(user_role::Column::UserId.eq(user.id.clone()))
        .one(&app.db)
        .await
        .unwrap()
        .expect("Link row should exist");

    assert_eq!(link.created_by.as_deref(), Some(ACTOR));
    assert!(link.created_at > 0);
}

#[tokio::test]
async fn test_assign_permissions_full_replace_and_validation() {
    let app = setup_app().await;
    let role = create_role(&app, "editor").await;
    let read = create_permission(&app, "books.read", "read").await;
    let update = create_permission(&app, "books.update", "update").await;

    app.rbac_service
        .assign_permissions_to_role(&role, &[read.clone(), update.clone()], ACTOR)
        .await
        .unwrap();

    // Duplicate ids rejected
    let result = app
        .rbac_service
        .assign_permissions_to_role(&role, &[read.clone(), read.clone()], ACTOR)
        .await;
    match result {
        Err(RbacError::Validation { field, .. }) => assert_eq!(field, "permission_ids"),
        other => panic!("Expected Validation error, got {other:?}"),
    }

    // Full replace down to a single permission
    app.rbac_service
        .assign_permissions_to_role(&role, &[update.clone()], ACTOR)
        .await
        .unwrap();

    let links = role_permission::Entity::find()
        .filter(role_permission::Column::RoleId.eq(role.clone()))
        .all(&app.db)
        .await
        .unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].permission_id, update);
}

#[tokio::test]
async fn test_permission_cardinality_limit() {
    let app = setup_app().await;
    let role = create_role(&app, "editor").await;

    let too_many: Vec<String> = (0..51).map(|i| format!("perm-{i}")).collect();
    let result = app
        .rbac_service
        .assign_permissions_to_role(&role, &too_many, ACTOR)
        .await;

    assert!(matches!(result, Err(RbacError::Validation { .. })));
}

#[tokio::test]
async fn test_duplicate_role_name_conflicts() {
    let app = setup_app().await;
    create_role(&app, "editor").await;

    let result = app
        .rbac_service
        .create_role("editor", None, false, ACTOR)
        .await;

    match result {
        Err(RbacError::IntegrityConflict { field }) => assert_eq!(field, "name"),
        other => panic!("Expected IntegrityConflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_permission_rejects_unknown_action() {
    let app = setup_app().await;

    let result = app
        .rbac_service
        .create_permission("books.browse", None, "browse", ACTOR)
        .await;

    match result {
        Err(RbacError::Validation { field, .. }) => assert_eq!(field, "action"),
        other => panic!("Expected Validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_role_set_clears_assignments() {
    let app = setup_app().await;
    let user = create_test_user(&app, "alice", "alice@example.com", "Str0ng!Pass").await;
    let reader = create_role(&app, "reader").await;

    app.rbac_service
        .assign_roles_to_user(&user.id, &[reader], ACTOR)
        .await
        .unwrap();
    app.rbac_service
        .assign_roles_to_user(&user.id, &[], ACTOR)
        .await
        .unwrap();

    assert!(user_role_ids(&app, &user.id).await.is_empty());
}
