//! Role domain model.
//!
//! Roles are used for role-based access control (RBAC).
//! They can be realm-level or client-level roles, and composite roles
//! contain other roles by id.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The entity that owns a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum RoleContainer {
    /// Realm-level role.
    Realm(Uuid),
    /// Role scoped to a client.
    Client(Uuid),
}

/// A role.
///
/// Roles represent permissions that can be granted to clients through scope
/// mappings. Two roles are equal when their ids are equal; the remaining
/// fields are descriptive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    // === Identity ===
    /// Unique identifier.
    pub id: Uuid,
    /// Role name (unique within realm or client).
    pub name: String,
    /// Role description.
    pub description: Option<String>,

    // === Scope ===
    /// Realm this role belongs to.
    pub realm_id: Uuid,
    /// Client this role belongs to (None for realm roles).
    pub client_id: Option<Uuid>,

    // === Timestamps ===
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last updated.
    pub updated_at: DateTime<Utc>,

    // === Composite Roles ===
    /// Composite role IDs (roles that this role directly includes).
    pub composite_roles: Vec<Uuid>,

    // === Custom Attributes ===
    /// Custom role attributes.
    pub attributes: HashMap<String, Vec<String>>,
}

impl Role {
    /// Creates a new realm role.
    #[must_use]
    pub fn new_realm_role(realm_id: Uuid, name: impl Into<String>) -> Self {
        Self::new(realm_id, None, name)
    }

    /// Creates a new client role.
    #[must_use]
    pub fn new_client_role(realm_id: Uuid, client_id: Uuid, name: impl Into<String>) -> Self {
        Self::new(realm_id, Some(client_id), name)
    }

    fn new(realm_id: Uuid, client_id: Option<Uuid>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            realm_id,
            client_id,
            created_at: now,
            updated_at: now,
            composite_roles: Vec::new(),
            attributes: HashMap::new(),
        }
    }

    /// Adds a composite role, ignoring duplicates.
    pub fn add_composite(&mut self, role_id: Uuid) {
        if !self.composite_roles.contains(&role_id) {
            self.composite_roles.push(role_id);
        }
    }

    /// Returns the entity that owns this role.
    #[must_use]
    pub const fn container(&self) -> RoleContainer {
        match self.client_id {
            Some(client_id) => RoleContainer::Client(client_id),
            None => RoleContainer::Realm(self.realm_id),
        }
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Role {}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
