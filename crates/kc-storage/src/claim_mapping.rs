//! Protocol claim mapping lookup trait.

use kc_model::ProtocolClaimMapping;
use uuid::Uuid;

use crate::error::StorageResult;

/// Read access to the protocol claim mappings defined in a realm.
///
/// Implementations must be thread-safe and support concurrent access.
pub trait ClaimMappingProvider: Send + Sync {
    /// Gets a claim mapping by ID.
    fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<ProtocolClaimMapping>>;
}
