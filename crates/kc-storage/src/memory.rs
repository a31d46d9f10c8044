//! In-memory providers.
//!
//! Thread-safe implementations of the storage traits backed by hash maps.
//! They are used by tests and by embedders that load a realm snapshot once.

use std::collections::HashMap;

use kc_model::{IdentityProviderRef, ProtocolClaimMapping, Role};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::claim_mapping::ClaimMappingProvider;
use crate::error::{StorageError, StorageResult};
use crate::identity_provider::IdentityProviderProvider;
use crate::role::RoleProvider;
use crate::scope_mapping::ScopeMappingProvider;

// ============================================================================
// Roles
// ============================================================================

/// In-memory role registry.
#[derive(Debug, Default)]
pub struct InMemoryRoleProvider {
    roles: RwLock<HashMap<(Uuid, Uuid), Role>>,
    unavailable: RwLock<bool>,
}

impl InMemoryRoleProvider {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a role.
    pub fn insert(&self, role: Role) {
        self.roles.write().insert((role.realm_id, role.id), role);
    }

    /// Removes a role, returning it if present.
    ///
    /// Scope mappings and composites referring to the role are left alone,
    /// as an external deletion would.
    pub fn remove(&self, realm_id: Uuid, id: Uuid) -> Option<Role> {
        self.roles.write().remove(&(realm_id, id))
    }

    /// Adds `child_id` to the composites of the stored role `parent_id`.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the parent role doesn't exist.
    pub fn add_composite(
        &self,
        realm_id: Uuid,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> StorageResult<()> {
        let mut roles = self.roles.write();
        let parent = roles
            .get_mut(&(realm_id, parent_id))
            .ok_or_else(|| StorageError::not_found("Role", parent_id))?;
        parent.add_composite(child_id);
        Ok(())
    }

    /// Makes every lookup fail with `StorageError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write() = unavailable;
    }
}

impl RoleProvider for InMemoryRoleProvider {
    fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<Role>> {
        if *self.unavailable.read() {
            return Err(StorageError::Unavailable("role registry offline".to_string()));
        }
        Ok(self.roles.read().get(&(realm_id, id)).cloned())
    }
}

// ============================================================================
// Identity providers
// ============================================================================

/// In-memory identity provider registry.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProviderProvider {
    providers: RwLock<HashMap<(Uuid, String), IdentityProviderRef>>,
}

impl InMemoryIdentityProviderProvider {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an identity provider in a realm.
    pub fn insert(&self, realm_id: Uuid, provider: IdentityProviderRef) {
        self.providers
            .write()
            .insert((realm_id, provider.id.clone()), provider);
    }
}

impl IdentityProviderProvider for InMemoryIdentityProviderProvider {
    fn get_by_id(&self, realm_id: Uuid, id: &str) -> StorageResult<Option<IdentityProviderRef>> {
        Ok(self
            .providers
            .read()
            .get(&(realm_id, id.to_string()))
            .cloned())
    }
}

// ============================================================================
// Claim mappings
// ============================================================================

/// In-memory protocol claim mapping registry.
#[derive(Debug, Default)]
pub struct InMemoryClaimMappingProvider {
    mappings: RwLock<HashMap<(Uuid, Uuid), ProtocolClaimMapping>>,
}

impl InMemoryClaimMappingProvider {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a claim mapping in a realm.
    pub fn insert(&self, realm_id: Uuid, mapping: ProtocolClaimMapping) {
        self.mappings.write().insert((realm_id, mapping.id), mapping);
    }
}

impl ClaimMappingProvider for InMemoryClaimMappingProvider {
    fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<ProtocolClaimMapping>> {
        Ok(self.mappings.read().get(&(realm_id, id)).cloned())
    }
}

// ============================================================================
// Scope mappings
// ============================================================================

/// In-memory scope-mapping edge store.
///
/// Edges are kept as a list per client so duplicate edges (as produced by
/// racing writers against a real database) can be represented.
#[derive(Debug, Default)]
pub struct InMemoryScopeMappingProvider {
    edges: RwLock<HashMap<Uuid, Vec<Uuid>>>,
    unavailable: RwLock<bool>,
}

impl InMemoryScopeMappingProvider {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored edges for a client, duplicates included.
    #[must_use]
    pub fn edge_count(&self, client_id: Uuid) -> usize {
        self.edges.read().get(&client_id).map_or(0, Vec::len)
    }

    /// Makes every operation fail with `StorageError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write() = unavailable;
    }

    fn check_available(&self) -> StorageResult<()> {
        if *self.unavailable.read() {
            return Err(StorageError::Unavailable(
                "scope mapping store offline".to_string(),
            ));
        }
        Ok(())
    }
}

impl ScopeMappingProvider for InMemoryScopeMappingProvider {
    fn role_ids(&self, client_id: Uuid) -> StorageResult<Vec<Uuid>> {
        self.check_available()?;
        Ok(self.edges.read().get(&client_id).cloned().unwrap_or_default())
    }

    fn insert(&self, client_id: Uuid, role_id: Uuid) -> StorageResult<()> {
        self.check_available()?;
        self.edges.write().entry(client_id).or_default().push(role_id);
        Ok(())
    }

    fn delete(&self, client_id: Uuid, role_id: Uuid) -> StorageResult<usize> {
        self.check_available()?;
        let mut edges = self.edges.write();
        let Some(roles) = edges.get_mut(&client_id) else {
            return Ok(0);
        };
        let before = roles.len();
        roles.retain(|id| *id != role_id);
        Ok(before - roles.len())
    }
}
