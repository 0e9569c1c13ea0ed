// Internal types - never serialized onto the API surface directly
pub mod auth;
pub mod security;

pub use auth::{Claims, Identity};
pub use security::SecurityStatus;
