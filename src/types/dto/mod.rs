// DTOs - request/response payloads for the API layer
pub mod admin;
pub mod auth;
pub mod rbac;
