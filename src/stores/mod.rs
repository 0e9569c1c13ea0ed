// Stores layer - Data access and repository pattern
//
// Stores are stateless query modules. Every operation takes the caller's
// connection or open transaction; stores never begin or commit transactions
// themselves - that boundary belongs to the services.
pub mod permission_store;
pub mod role_store;
pub mod user_store;

pub use permission_store::PermissionStore;
pub use role_store::RoleStore;
pub use user_store::UserStore;
