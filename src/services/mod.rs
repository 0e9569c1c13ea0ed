// Services layer - Business logic and orchestration
pub mod admin_service;
pub mod auth_service;
pub mod lockout;
pub mod password;
pub mod rbac_service;
pub mod token_service;
pub mod validation;

pub use admin_service::AdminService;
pub use auth_service::{AuthService, LoginOutcome};
pub use lockout::LockoutPolicy;
pub use password::PasswordHasher;
pub use rbac_service::RbacService;
pub use token_service::{IssuedToken, TokenService};
