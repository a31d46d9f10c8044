//! Role lookup trait.

use kc_model::Role;
use uuid::Uuid;

use crate::error::StorageResult;

/// Read access to the realm's role registry.
///
/// Implementations must be thread-safe and support concurrent access.
pub trait RoleProvider: Send + Sync {
    /// Gets a role by ID.
    ///
    /// Returns `Ok(None)` when no such role exists in the realm; callers
    /// decide whether a missing role is an error.
    fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<Role>>;
}
