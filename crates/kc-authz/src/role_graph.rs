//! Transitive role containment.
//!
//! Composite roles form a directed graph through `Role::composite_roles`.
//! The graph is expected to be acyclic and shallow, but nothing prevents a
//! misconfigured realm from creating a cycle, so every walk tracks visited
//! roles and stops at a configured depth.

use std::collections::{HashSet, VecDeque};

use kc_model::Role;
use kc_storage::RoleProvider;
use uuid::Uuid;

/// Read-only view over the role registry of one realm.
#[derive(Clone, Copy)]
pub struct RoleGraph<'a> {
    roles: &'a dyn RoleProvider,
    realm_id: Uuid,
    max_depth: usize,
}

impl<'a> RoleGraph<'a> {
    /// Creates a graph view over `roles` for `realm_id`.
    ///
    /// `max_depth` bounds how many composite edges a walk follows from its
    /// starting role.
    #[must_use]
    pub fn new(roles: &'a dyn RoleProvider, realm_id: Uuid, max_depth: usize) -> Self {
        Self {
            roles,
            realm_id,
            max_depth,
        }
    }

    /// Looks up a role by id.
    ///
    /// A missing role and a failing registry both yield `None`: callers skip
    /// roles they cannot see rather than failing the whole decision.
    #[must_use]
    pub fn resolve(&self, role_id: Uuid) -> Option<Role> {
        match self.roles.get_by_id(self.realm_id, role_id) {
            Ok(Some(role)) => Some(role),
            Ok(None) => {
                tracing::debug!(realm_id = %self.realm_id, %role_id, "Role not found, skipping");
                None
            }
            Err(e) => {
                tracing::warn!(
                    realm_id = %self.realm_id,
                    %role_id,
                    error = %e,
                    "Role lookup failed, treating as missing"
                );
                None
            }
        }
    }

    /// Checks whether `candidate` is `ancestor` or is reachable from it
    /// through composite roles.
    #[must_use]
    pub fn contains(&self, ancestor: &Role, candidate: &Role) -> bool {
        if ancestor.id == candidate.id {
            return true;
        }
        self.walk(ancestor, |role| role.id == candidate.id)
    }

    /// Returns `role` together with every role it transitively contains.
    #[must_use]
    pub fn expand(&self, role: &Role) -> HashSet<Role> {
        let mut expanded = HashSet::new();
        expanded.insert(role.clone());
        self.walk(role, |child| {
            expanded.insert(child.clone());
            false
        });
        expanded
    }

    /// Breadth-first walk over the composites of `root` (excluding `root`).
    ///
    /// Each role is visited once, at its shortest depth from `root`. Stops
    /// early and returns `true` as soon as `visit` returns `true`.
    fn walk<F>(&self, root: &Role, mut visit: F) -> bool
    where
        F: FnMut(&Role) -> bool,
    {
        let mut visited: HashSet<Uuid> = HashSet::new();
        visited.insert(root.id);

        let mut queue: VecDeque<(Uuid, usize)> =
            root.composite_roles.iter().map(|id| (*id, 1)).collect();
        let mut truncated = false;

        while let Some((role_id, depth)) = queue.pop_front() {
            if depth > self.max_depth {
                truncated = true;
                continue;
            }
            if !visited.insert(role_id) {
                if role_id == root.id {
                    tracing::debug!(root = %root.id, "Composite cycle back to starting role");
                }
                continue;
            }
            let Some(role) = self.resolve(role_id) else {
                continue;
            };
            if visit(&role) {
                return true;
            }
            queue.extend(role.composite_roles.iter().map(|id| (*id, depth + 1)));
        }

        if truncated {
            tracing::warn!(
                root = %root.id,
                max_depth = self.max_depth,
                "Composite role walk exceeded maximum depth, deeper roles ignored"
            );
        }
        false
    }
}

impl std::fmt::Debug for RoleGraph<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleGraph")
            .field("realm_id", &self.realm_id)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
