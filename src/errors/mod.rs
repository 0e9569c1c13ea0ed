// Errors layer - Error type definitions
//
// Hybrid design separates infrastructure errors (shared) from domain errors
// (per subsystem). Domain errors are closed enums the services return;
// endpoints convert them to the API types under `api`.
pub mod api;
pub mod auth;
pub mod internal;
pub mod rbac;
pub mod token;

pub use auth::AuthError;
pub use internal::InternalError;
pub use rbac::RbacError;
pub use token::TokenError;
