use poem_openapi::Object;

/// Full-replace role assignment for one user
#[derive(Object, Debug)]
pub struct AssignRolesRequest {
    /// Complete set of role ids the user should hold afterwards
    pub role_ids: Vec<String>,
}

/// Full-replace permission assignment for one role
#[derive(Object, Debug)]
pub struct AssignPermissionsRequest {
    /// Complete set of permission ids the role should grant afterwards
    pub permission_ids: Vec<String>,
}

/// Request to create a new role
#[derive(Object, Debug)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
    /// Attach this role automatically to newly created users
    pub is_default: Option<bool>,
}

/// Request to create a new permission
#[derive(Object, Debug)]
pub struct CreatePermissionRequest {
    pub name: String,
    pub description: Option<String>,
    /// One of: create, read, update, delete, execute
    pub action: String,
}

/// A permission as seen through effective-permission resolution
#[derive(Object, Debug)]
pub struct PermissionView {
    pub id: String,
    pub name: String,
    pub action: String,
}
