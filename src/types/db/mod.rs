// Database entities - SeaORM models
pub mod permission;
pub mod role;
pub mod role_permission;
pub mod user;
pub mod user_role;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select};

/// Capability trait for entities that support soft delete
///
/// An entity either implements this and gains the filtered query helper, or
/// it does not support soft delete at all. Resolved at compile time; there
/// is no runtime probing for the column.
pub trait SoftDeletable: EntityTrait {
    fn deleted_at_column() -> Self::Column;

    /// Select only rows that have not been soft-deleted
    fn find_active() -> Select<Self> {
        Self::find().filter(Self::deleted_at_column().is_null())
    }
}
