//! Identity provider lookup trait.

use kc_model::IdentityProviderRef;
use uuid::Uuid;

use crate::error::StorageResult;

/// Read access to the realm's identity providers.
///
/// Implementations must be thread-safe and support concurrent access.
pub trait IdentityProviderProvider: Send + Sync {
    /// Gets an identity provider by its id (alias).
    fn get_by_id(&self, realm_id: Uuid, id: &str) -> StorageResult<Option<IdentityProviderRef>>;
}
