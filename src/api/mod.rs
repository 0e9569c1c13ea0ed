// API layer - HTTP endpoints
//
// Controllers stay thin: every handler resolves its caller, delegates to a
// core service and converts the result. No business logic lives here.
pub mod admin;
pub mod auth;
pub mod health;
pub mod rbac;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use health::HealthApi;
pub use rbac::RbacApi;

use poem_openapi::{auth::Bearer, SecurityScheme};

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);
