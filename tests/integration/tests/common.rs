//! Common test utilities and fixtures.

use std::sync::Arc;

use kc_authz::{ClientAuthorizationModel, Collaborators};
use kc_core::{AuthzConfig, LoggingConfig};
use kc_model::{ClaimSource, Client, IdentityProviderRef, Protocol, ProtocolClaimMapping, Role};
use kc_storage::memory::{
    InMemoryClaimMappingProvider, InMemoryIdentityProviderProvider, InMemoryRoleProvider,
    InMemoryScopeMappingProvider,
};
use uuid::Uuid;

/// One realm backed by in-memory providers.
pub struct TestRealm {
    /// Realm id.
    pub realm_id: Uuid,
    /// Role registry.
    pub roles: Arc<InMemoryRoleProvider>,
    /// Identity provider registry.
    pub identity_providers: Arc<InMemoryIdentityProviderProvider>,
    /// Claim mapping registry.
    pub claim_mappings: Arc<InMemoryClaimMappingProvider>,
    /// Scope-mapping edges.
    pub scope_mappings: Arc<InMemoryScopeMappingProvider>,
    /// Configuration handed to every model.
    pub config: AuthzConfig,
}

impl TestRealm {
    /// Creates an empty realm with default configuration.
    pub fn new() -> Self {
        Self::with_config(AuthzConfig::default())
    }

    /// Creates an empty realm with the given configuration.
    pub fn with_config(config: AuthzConfig) -> Self {
        kc_core::logging::init(&LoggingConfig {
            filter: "kc_authz=debug".to_string(),
            json: false,
        });

        Self {
            realm_id: Uuid::now_v7(),
            roles: Arc::new(InMemoryRoleProvider::new()),
            identity_providers: Arc::new(InMemoryIdentityProviderProvider::new()),
            claim_mappings: Arc::new(InMemoryClaimMappingProvider::new()),
            scope_mappings: Arc::new(InMemoryScopeMappingProvider::new()),
            config,
        }
    }

    /// Returns collaborators sharing this realm's providers.
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            roles: self.roles.clone(),
            identity_providers: self.identity_providers.clone(),
            claim_mappings: self.claim_mappings.clone(),
            scope_mappings: self.scope_mappings.clone(),
        }
    }

    /// Registers a realm role containing `children`.
    pub fn role(&self, name: &str, children: &[&Role]) -> Role {
        let mut role = Role::new_realm_role(self.realm_id, name);
        for child in children {
            role.add_composite(child.id);
        }
        self.roles.insert(role.clone());
        role
    }

    /// Registers an identity provider.
    pub fn identity_provider(&self, id: &str) {
        self.identity_providers
            .insert(self.realm_id, IdentityProviderRef::new(id, "oidc"));
    }

    /// Registers an OIDC claim mapping fed from a user attribute.
    pub fn claim_mapping(&self, claim: &str) -> ProtocolClaimMapping {
        let mapping = ProtocolClaimMapping::new(
            Protocol::OpenidConnect,
            claim,
            ClaimSource::UserAttribute,
            claim,
        )
        .with_name(format!("{claim} mapper"));
        self.claim_mappings.insert(self.realm_id, mapping.clone());
        mapping
    }

    /// Creates a plain client in this realm.
    pub fn client(&self, client_id: &str) -> Client {
        Client::new(self.realm_id, client_id).with_name(client_id.to_uppercase())
    }

    /// Loads the authorization model for `client`.
    pub fn load(&self, client: Client) -> anyhow::Result<ClientAuthorizationModel> {
        Ok(ClientAuthorizationModel::load(
            client,
            self.collaborators(),
            &self.config,
        )?)
    }
}
