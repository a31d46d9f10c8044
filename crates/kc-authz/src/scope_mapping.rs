//! Scope mappings: roles directly granted to a client.

use std::collections::HashSet;
use std::sync::Arc;

use kc_model::{Role, RoleContainer};
use kc_storage::{ScopeMappingProvider, StorageResult};
use uuid::Uuid;

use crate::role_graph::RoleGraph;

/// The set of `(client, role)` edges owned by one client.
///
/// Granted role ids are held in memory for constant-time membership; every
/// change is written through to the [`ScopeMappingProvider`] first.
pub struct ScopeMappingSet {
    client_id: Uuid,
    role_ids: HashSet<Uuid>,
    store: Arc<dyn ScopeMappingProvider>,
}

impl ScopeMappingSet {
    /// Loads the granted role ids of `client_id` from `store`.
    ///
    /// ## Errors
    ///
    /// Returns the storage error if the edges cannot be read.
    pub fn load(client_id: Uuid, store: Arc<dyn ScopeMappingProvider>) -> StorageResult<Self> {
        let role_ids = store.role_ids(client_id)?.into_iter().collect();
        Ok(Self {
            client_id,
            role_ids,
            store,
        })
    }

    /// Returns the ids of all directly granted roles, stale ones included.
    #[must_use]
    pub fn role_ids(&self) -> HashSet<Uuid> {
        self.role_ids.clone()
    }

    /// Returns the directly granted roles.
    ///
    /// Ids that no longer resolve (the role was deleted elsewhere) are
    /// dropped from the result.
    #[must_use]
    pub fn direct_roles(&self, graph: &RoleGraph<'_>) -> HashSet<Role> {
        self.role_ids
            .iter()
            .filter_map(|id| graph.resolve(*id))
            .collect()
    }

    /// Returns the directly granted roles that belong to `realm_id` itself
    /// rather than to a client.
    #[must_use]
    pub fn realm_scoped_roles(&self, graph: &RoleGraph<'_>, realm_id: Uuid) -> HashSet<Role> {
        self.direct_roles(graph)
            .into_iter()
            .filter(|role| role.container() == RoleContainer::Realm(realm_id))
            .collect()
    }

    /// Returns every role the client may act under through its grants:
    /// the direct roles and everything they contain.
    #[must_use]
    pub fn effective_roles(&self, graph: &RoleGraph<'_>) -> HashSet<Role> {
        self.direct_roles(graph)
            .iter()
            .flat_map(|role| graph.expand(role))
            .collect()
    }

    /// Decides whether the client may act under `role`.
    ///
    /// Full scope grants everything. Otherwise a direct grant is checked
    /// first, then containment through each granted role.
    #[must_use]
    pub fn has_scope(&self, role: &Role, graph: &RoleGraph<'_>, full_scope_allowed: bool) -> bool {
        if full_scope_allowed {
            return true;
        }

        let granted = self.direct_roles(graph);
        if granted.contains(role) {
            return true;
        }

        granted.iter().any(|mapping| graph.contains(mapping, role))
    }

    /// Grants `role` to the client.
    ///
    /// Does nothing and returns `false` when [`has_scope`](Self::has_scope)
    /// already holds, including through containment or full scope, or when
    /// an edge for `role` is already held. The latter covers roles the graph
    /// cannot resolve, so a pair never gets a second edge.
    ///
    /// ## Errors
    ///
    /// Returns the storage error if the edge cannot be written; the set is
    /// unchanged in that case.
    pub fn add(
        &mut self,
        role: &Role,
        graph: &RoleGraph<'_>,
        full_scope_allowed: bool,
    ) -> StorageResult<bool> {
        if self.role_ids.contains(&role.id) || self.has_scope(role, graph, full_scope_allowed) {
            tracing::debug!(
                client_id = %self.client_id,
                role_id = %role.id,
                "Role already in scope"
            );
            return Ok(false);
        }

        self.store.insert(self.client_id, role.id)?;
        self.role_ids.insert(role.id);
        Ok(true)
    }

    /// Revokes the direct grant of `role`.
    ///
    /// Every stored edge for the pair is deleted, so duplicates left by
    /// racing writers disappear too. Returns `false` if nothing was granted.
    ///
    /// ## Errors
    ///
    /// Returns the storage error if the edges cannot be deleted; the set is
    /// unchanged in that case.
    pub fn remove(&mut self, role: &Role) -> StorageResult<bool> {
        let deleted = self.store.delete(self.client_id, role.id)?;
        let held = self.role_ids.remove(&role.id);
        Ok(deleted > 0 || held)
    }
}

impl std::fmt::Debug for ScopeMappingSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeMappingSet")
            .field("client_id", &self.client_id)
            .field("role_ids", &self.role_ids)
            .finish_non_exhaustive()
    }
}
