//! Scope mapping persistence trait.

use uuid::Uuid;

use crate::error::StorageResult;

/// Persistence delegate for `(client, role)` scope-mapping edges.
///
/// Each call is one step of the caller's unit of work; durability and
/// rollback belong to the caller's transaction boundary.
///
/// Implementations must be thread-safe and support concurrent access.
pub trait ScopeMappingProvider: Send + Sync {
    /// Lists the role ids directly granted to a client.
    ///
    /// The list may contain duplicates if concurrent writers raced, and ids
    /// of roles that were deleted since the edge was written.
    fn role_ids(&self, client_id: Uuid) -> StorageResult<Vec<Uuid>>;

    /// Stores a `(client, role)` edge.
    fn insert(&self, client_id: Uuid, role_id: Uuid) -> StorageResult<()>;

    /// Deletes every `(client, role)` edge and returns how many were removed.
    ///
    /// Deleting a missing edge is not an error and returns `0`.
    fn delete(&self, client_id: Uuid, role_id: Uuid) -> StorageResult<usize>;
}
