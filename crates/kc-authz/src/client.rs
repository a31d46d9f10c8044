//! Client authorization model.
//!
//! [`ClientAuthorizationModel`] wraps a stored [`Client`] for the duration
//! of one unit of work and exposes the client's authorization decisions:
//! which roles it may act under, which identity providers it may use and
//! which claim mappings apply to its tokens.
//!
//! ## Ownership
//!
//! The model exclusively owns the client's scope mappings, allow-lists and
//! claim mapping catalog. Roles are only referenced by id. The model is not
//! internally synchronized; concurrent writers to the same client are the
//! persistence layer's concern.
//!
//! ## NIST 800-53 Rev5: AU-2 (Event Logging)
//!
//! Every effective change to what the client may do is recorded as an
//! [`Event`]; the caller drains them with
//! [`take_events`](ClientAuthorizationModel::take_events) and commits them
//! with its unit of work.

use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::Utc;
use kc_core::AuthzConfig;
use kc_core::event::{Event, EventBuilder, EventType};
use kc_model::{Client, Protocol, ProtocolClaimMapping, Role};
use kc_storage::{
    ClaimMappingProvider, IdentityProviderProvider, RoleProvider, ScopeMappingProvider,
};
use uuid::Uuid;

use crate::claim_mapping::ClaimMappingCatalog;
use crate::error::AuthzResult;
use crate::identity_provider::IdentityProviderAllowList;
use crate::role_graph::RoleGraph;
use crate::scope_mapping::ScopeMappingSet;

/// External collaborators the model resolves ids and persists edges with.
#[derive(Clone)]
pub struct Collaborators {
    /// Realm role registry.
    pub roles: Arc<dyn RoleProvider>,
    /// Realm identity providers.
    pub identity_providers: Arc<dyn IdentityProviderProvider>,
    /// Realm protocol claim mappings.
    pub claim_mappings: Arc<dyn ClaimMappingProvider>,
    /// Scope-mapping edge persistence.
    pub scope_mappings: Arc<dyn ScopeMappingProvider>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Authorization view of one client.
///
/// Two models are equal when they wrap the same client id, regardless of
/// any other field.
pub struct ClientAuthorizationModel {
    /// Scalar fields, redirect URIs, web origins and attributes. The
    /// allow-list and claim mappings live in their components below.
    entity: Client,
    scope_mappings: ScopeMappingSet,
    identity_providers: IdentityProviderAllowList,
    claim_mappings: ClaimMappingCatalog,
    collaborators: Collaborators,
    config: AuthzConfig,
    events: Vec<Event>,
}

impl ClientAuthorizationModel {
    /// Builds the model for a stored client.
    ///
    /// ## Errors
    ///
    /// Returns `AuthzError::Storage` if the client's scope mappings cannot be
    /// loaded.
    pub fn load(
        mut client: Client,
        collaborators: Collaborators,
        config: &AuthzConfig,
    ) -> AuthzResult<Self> {
        let scope_mappings =
            ScopeMappingSet::load(client.id, Arc::clone(&collaborators.scope_mappings))?;
        let identity_providers =
            IdentityProviderAllowList::new(std::mem::take(&mut client.allowed_identity_providers));
        let claim_mappings =
            ClaimMappingCatalog::new(std::mem::take(&mut client.protocol_claim_mappings));

        tracing::debug!(
            client_id = %client.client_id,
            id = %client.id,
            granted_roles = scope_mappings.role_ids().len(),
            "Loaded client authorization model"
        );

        Ok(Self {
            entity: client,
            scope_mappings,
            identity_providers,
            claim_mappings,
            collaborators,
            config: config.clone(),
            events: Vec::new(),
        })
    }

    /// Returns a full snapshot of the client for the persistence layer.
    #[must_use]
    pub fn to_entity(&self) -> Client {
        let mut client = self.entity.clone();
        client.allowed_identity_providers = self.identity_providers.providers();
        client.protocol_claim_mappings = self.claim_mappings.list();
        client
    }

    /// Drains the audit events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Identity and flags
    // ========================================================================

    /// Returns the stable client id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.entity.id
    }

    /// Returns the realm the client belongs to.
    #[must_use]
    pub const fn realm_id(&self) -> Uuid {
        self.entity.realm_id
    }

    /// Returns the OAuth `client_id`.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.entity.client_id
    }

    /// Renames the client. Uniqueness within the realm is checked by the
    /// persistence layer.
    pub fn set_client_id(&mut self, client_id: impl Into<String>) {
        self.entity.client_id = client_id.into();
        self.touch();
    }

    /// Checks if the client is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.entity.enabled
    }

    /// Enables or disables the client.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.entity.enabled = enabled;
        self.touch();
    }

    /// Checks if this is a public client (no secret required).
    #[must_use]
    pub const fn is_public_client(&self) -> bool {
        self.entity.public_client
    }

    /// Marks the client as public or confidential.
    pub fn set_public_client(&mut self, public_client: bool) {
        self.entity.public_client = public_client;
        self.touch();
    }

    /// Checks if the client bypasses scope mapping checks.
    #[must_use]
    pub const fn is_full_scope_allowed(&self) -> bool {
        self.entity.full_scope_allowed
    }

    /// Sets whether the client bypasses scope mapping checks.
    pub fn set_full_scope_allowed(&mut self, full_scope_allowed: bool) {
        self.entity.full_scope_allowed = full_scope_allowed;
        self.touch();
    }

    /// Checks if the client uses front-channel logout.
    #[must_use]
    pub const fn is_frontchannel_logout(&self) -> bool {
        self.entity.frontchannel_logout
    }

    /// Sets front-channel logout.
    pub fn set_frontchannel_logout(&mut self, frontchannel_logout: bool) {
        self.entity.frontchannel_logout = frontchannel_logout;
        self.touch();
    }

    /// Returns the legacy allowed-claims bitmask.
    #[must_use]
    pub const fn allowed_claims_mask(&self) -> u64 {
        self.entity.allowed_claims_mask
    }

    /// Sets the legacy allowed-claims bitmask.
    pub fn set_allowed_claims_mask(&mut self, mask: u64) {
        self.entity.allowed_claims_mask = mask;
        self.touch();
    }

    /// Returns the client's protocol.
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        self.entity.protocol
    }

    /// Sets the client's protocol.
    pub fn set_protocol(&mut self, protocol: Protocol) {
        self.entity.protocol = protocol;
        self.touch();
    }

    /// Returns the not-before timestamp.
    #[must_use]
    pub const fn not_before(&self) -> i64 {
        self.entity.not_before
    }

    /// Sets the not-before timestamp; tokens issued earlier are invalid.
    pub fn set_not_before(&mut self, not_before: i64) {
        self.entity.not_before = not_before;
        self.touch();
    }

    // ========================================================================
    // Secret
    // ========================================================================

    /// Returns the stored secret, if any.
    #[must_use]
    pub fn secret(&self) -> Option<&str> {
        self.entity.secret.as_deref()
    }

    /// Replaces the client secret.
    pub fn set_secret(&mut self, secret: impl Into<String>) {
        self.entity.secret = Some(secret.into());
        self.touch();
        self.record(Event::builder(EventType::ClientSecretUpdated));
    }

    /// Checks `candidate` against the stored secret.
    ///
    /// The comparison runs in time independent of where the inputs differ.
    /// A client without a secret never validates.
    #[must_use]
    pub fn validate_secret(&self, candidate: &str) -> bool {
        self.entity
            .secret
            .as_deref()
            .is_some_and(|secret| secrets_match(secret.as_bytes(), candidate.as_bytes()))
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// Returns one attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.entity.attributes.get(name).cloned()
    }

    /// Returns a copy of all attributes.
    #[must_use]
    pub fn attributes(&self) -> HashMap<String, String> {
        self.entity.attributes.clone()
    }

    /// Sets an attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entity.attributes.insert(name.into(), value.into());
        self.touch();
    }

    /// Removes an attribute.
    pub fn remove_attribute(&mut self, name: &str) {
        if self.entity.attributes.remove(name).is_some() {
            self.touch();
        }
    }

    // ========================================================================
    // Redirect URIs and web origins
    // ========================================================================

    /// Returns a copy of the redirect URIs.
    #[must_use]
    pub fn redirect_uris(&self) -> HashSet<String> {
        self.entity.redirect_uris.clone()
    }

    /// Replaces the redirect URIs.
    pub fn set_redirect_uris(&mut self, uris: HashSet<String>) {
        self.entity.redirect_uris = uris;
        self.touch();
    }

    /// Adds a redirect URI.
    pub fn add_redirect_uri(&mut self, uri: impl Into<String>) {
        if self.entity.redirect_uris.insert(uri.into()) {
            self.touch();
        }
    }

    /// Removes a redirect URI.
    pub fn remove_redirect_uri(&mut self, uri: &str) {
        if self.entity.redirect_uris.remove(uri) {
            self.touch();
        }
    }

    /// Checks whether `uri` is a registered redirect URI (exact match).
    #[must_use]
    pub fn has_redirect_uri(&self, uri: &str) -> bool {
        self.entity.redirect_uris.contains(uri)
    }

    /// Returns a copy of the web origins.
    #[must_use]
    pub fn web_origins(&self) -> HashSet<String> {
        self.entity.web_origins.clone()
    }

    /// Replaces the web origins.
    pub fn set_web_origins(&mut self, origins: HashSet<String>) {
        self.entity.web_origins = origins;
        self.touch();
    }

    /// Adds a web origin.
    pub fn add_web_origin(&mut self, origin: impl Into<String>) {
        if self.entity.web_origins.insert(origin.into()) {
            self.touch();
        }
    }

    /// Removes a web origin.
    pub fn remove_web_origin(&mut self, origin: &str) {
        if self.entity.web_origins.remove(origin) {
            self.touch();
        }
    }

    /// Checks whether `origin` is a registered web origin (exact match).
    #[must_use]
    pub fn has_web_origin(&self, origin: &str) -> bool {
        self.entity.web_origins.contains(origin)
    }

    // ========================================================================
    // Scope mappings
    // ========================================================================

    /// Returns the roles directly granted to the client.
    #[must_use]
    pub fn scope_mappings(&self) -> HashSet<Role> {
        self.scope_mappings.direct_roles(&self.role_graph())
    }

    /// Returns the directly granted roles that belong to the client's realm.
    #[must_use]
    pub fn realm_scope_mappings(&self) -> HashSet<Role> {
        self.scope_mappings
            .realm_scoped_roles(&self.role_graph(), self.entity.realm_id)
    }

    /// Returns the granted roles plus every role they contain.
    ///
    /// Full scope is not expanded here; check
    /// [`is_full_scope_allowed`](Self::is_full_scope_allowed) first.
    #[must_use]
    pub fn effective_scope(&self) -> HashSet<Role> {
        self.scope_mappings.effective_roles(&self.role_graph())
    }

    /// Decides whether the client may act under `role`.
    #[must_use]
    pub fn has_scope(&self, role: &Role) -> bool {
        self.scope_mappings
            .has_scope(role, &self.role_graph(), self.entity.full_scope_allowed)
    }

    /// Grants `role` to the client.
    ///
    /// A role already in scope (directly, through containment, or because
    /// of full scope) is left alone and `false` is returned.
    ///
    /// ## Errors
    ///
    /// Returns `AuthzError::Storage` if the edge cannot be written.
    pub fn add_scope_mapping(&mut self, role: &Role) -> AuthzResult<bool> {
        let graph = RoleGraph::new(
            self.collaborators.roles.as_ref(),
            self.entity.realm_id,
            self.config.max_role_depth,
        );
        let added = self
            .scope_mappings
            .add(role, &graph, self.entity.full_scope_allowed)?;

        if added {
            self.record(
                Event::builder(EventType::ScopeMappingAdded)
                    .detail("role_id", role.id.to_string())
                    .detail("role_name", role.name.clone()),
            );
        }
        Ok(added)
    }

    /// Revokes the direct grant of `role`.
    ///
    /// ## Errors
    ///
    /// Returns `AuthzError::Storage` if the edges cannot be deleted.
    pub fn remove_scope_mapping(&mut self, role: &Role) -> AuthzResult<bool> {
        let removed = self.scope_mappings.remove(role)?;

        if removed {
            self.record(
                Event::builder(EventType::ScopeMappingRemoved)
                    .detail("role_id", role.id.to_string())
                    .detail("role_name", role.name.clone()),
            );
        }
        Ok(removed)
    }

    // ========================================================================
    // Identity providers
    // ========================================================================

    /// Returns the allowed identity provider ids. Empty means all.
    #[must_use]
    pub fn allowed_identity_providers(&self) -> Vec<String> {
        self.identity_providers.ids()
    }

    /// Checks whether the client may log in through `provider_id`.
    ///
    /// An empty allow-list allows every provider.
    #[must_use]
    pub fn has_identity_provider(&self, provider_id: &str) -> bool {
        self.identity_providers.has_identity_provider(provider_id)
    }

    /// Replaces the identity provider allow-list.
    ///
    /// ## Errors
    ///
    /// Returns `AuthzError::UnknownIdentityProvider` if any id does not exist
    /// in the realm; the allow-list is unchanged in that case.
    pub fn update_allowed_identity_providers(
        &mut self,
        provider_ids: &[String],
    ) -> AuthzResult<()> {
        let providers = Arc::clone(&self.collaborators.identity_providers);
        let realm_id = self.entity.realm_id;

        let result = self
            .identity_providers
            .update(provider_ids, |id| providers.get_by_id(realm_id, id));

        match result {
            Ok(outcome) => {
                if !outcome.is_unchanged() {
                    self.touch();
                    self.record(
                        Event::builder(EventType::IdentityProvidersUpdated)
                            .detail("added", outcome.added.join(","))
                            .detail("removed", outcome.removed.join(",")),
                    );
                }
                Ok(())
            }
            Err(e) => {
                self.record(
                    Event::builder(EventType::IdentityProvidersUpdated).failure(e.to_string()),
                );
                Err(e)
            }
        }
    }

    // ========================================================================
    // Protocol claim mappings
    // ========================================================================

    /// Returns snapshots of the attached claim mappings.
    #[must_use]
    pub fn protocol_claim_mappings(&self) -> Vec<ProtocolClaimMapping> {
        self.claim_mappings.list()
    }

    /// Returns the claim mapping catalog for read-only queries.
    #[must_use]
    pub const fn claim_mapping_catalog(&self) -> &ClaimMappingCatalog {
        &self.claim_mappings
    }

    /// Attaches the claim mappings named in `ids` (UUIDs in string form).
    ///
    /// Unknown or malformed ids are handled per
    /// `AuthzConfig::claim_mapping_unknown_ids` (skipped by default).
    ///
    /// ## Errors
    ///
    /// Returns `AuthzError::UnknownClaimMapping` under the `reject` policy
    /// and `AuthzError::Storage` if the lookup fails.
    pub fn add_protocol_claim_mappings<S: AsRef<str>>(&mut self, ids: &[S]) -> AuthzResult<()> {
        let lookup = Arc::clone(&self.collaborators.claim_mappings);
        let realm_id = self.entity.realm_id;

        let outcome = self.claim_mappings.add_by_ids(
            ids,
            |id| lookup.get_by_id(realm_id, *id),
            self.config.claim_mapping_unknown_ids,
        )?;

        if !outcome.added.is_empty() {
            self.touch();
            self.record(
                Event::builder(EventType::ClaimMappingsAdded)
                    .detail("added", outcome.added.join(","))
                    .detail("skipped", outcome.skipped.join(",")),
            );
        }
        Ok(())
    }

    /// Detaches the claim mappings named in `ids`; unknown or malformed ids
    /// are ignored.
    pub fn remove_protocol_claim_mappings<S: AsRef<str>>(&mut self, ids: &[S]) {
        let removed = self.claim_mappings.remove_by_ids(ids);

        if !removed.is_empty() {
            let removed: Vec<String> = removed.iter().map(Uuid::to_string).collect();
            self.touch();
            self.record(
                Event::builder(EventType::ClaimMappingsRemoved)
                    .detail("removed", removed.join(",")),
            );
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn role_graph(&self) -> RoleGraph<'_> {
        RoleGraph::new(
            self.collaborators.roles.as_ref(),
            self.entity.realm_id,
            self.config.max_role_depth,
        )
    }

    fn touch(&mut self) {
        self.entity.updated_at = Utc::now();
    }

    fn record(&mut self, builder: EventBuilder) {
        let event = builder
            .realm(self.entity.realm_id)
            .client(self.entity.client_id.clone())
            .build();
        event.trace();
        self.events.push(event);
    }
}

impl PartialEq for ClientAuthorizationModel {
    fn eq(&self, other: &Self) -> bool {
        self.entity.id == other.entity.id
    }
}

impl Eq for ClientAuthorizationModel {}

impl Hash for ClientAuthorizationModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity.id.hash(state);
    }
}

impl std::fmt::Debug for ClientAuthorizationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientAuthorizationModel")
            .field("id", &self.entity.id)
            .field("client_id", &self.entity.client_id)
            .field("scope_mappings", &self.scope_mappings)
            .field("identity_providers", &self.identity_providers.ids())
            .finish_non_exhaustive()
    }
}

/// Compares a stored secret with a candidate without short-circuiting on
/// the first differing byte.
fn secrets_match(stored: &[u8], candidate: &[u8]) -> bool {
    stored.len() == candidate.len()
        && stored
            .iter()
            .zip(candidate)
            .fold(0u8, |diff, (x, y)| diff | (x ^ y))
            == 0
}
