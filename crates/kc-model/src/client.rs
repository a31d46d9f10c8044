//! Client domain model.
//!
//! Clients represent applications that can request authentication
//! and authorization from the realm (OAuth 2.0 / OIDC or SAML clients).

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::claim_mapping::ProtocolClaimMapping;
use crate::identity_provider::IdentityProviderRef;

/// Protocol type for a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    /// `OpenID` Connect protocol.
    #[default]
    OpenidConnect,
    /// SAML 2.0 protocol.
    Saml,
}

/// A client as stored by the persistence layer.
///
/// Scope mappings are separate `(client, role)` edges and are not part of
/// this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)] // Domain model naturally has many boolean flags
pub struct Client {
    // === Identity ===
    /// Unique identifier.
    pub id: Uuid,
    /// Realm this client belongs to.
    pub realm_id: Uuid,
    /// Client identifier (OAuth `client_id`), unique within the realm.
    pub client_id: String,
    /// Display name.
    pub name: Option<String>,
    /// Whether the client is enabled.
    pub enabled: bool,

    // === Timestamps ===
    /// When the client was created.
    pub created_at: DateTime<Utc>,
    /// When the client was last updated.
    pub updated_at: DateTime<Utc>,

    // === Protocol ===
    /// Protocol type (OIDC or SAML).
    pub protocol: Protocol,

    // === Client Type ===
    /// Client secret (for confidential clients).
    pub secret: Option<String>,
    /// Whether this is a public client.
    pub public_client: bool,

    // === Tokens ===
    /// Tokens issued before this timestamp are invalid.
    pub not_before: i64,
    /// Legacy bitmask selecting which claims are allowed.
    pub allowed_claims_mask: u64,

    // === URLs ===
    /// Allowed redirect URIs.
    pub redirect_uris: HashSet<String>,
    /// Allowed web origins (CORS).
    pub web_origins: HashSet<String>,

    // === Logout ===
    /// Use front-channel logout.
    pub frontchannel_logout: bool,

    // === Scope ===
    /// Allow full scope (bypasses scope mapping checks).
    pub full_scope_allowed: bool,

    // === Federation ===
    /// Identity providers allowed for federated login. Empty means all.
    pub allowed_identity_providers: Vec<IdentityProviderRef>,

    // === Claims ===
    /// Protocol claim mappings attached to this client.
    pub protocol_claim_mappings: Vec<ProtocolClaimMapping>,

    // === Custom Attributes ===
    /// Custom client attributes.
    pub attributes: HashMap<String, String>,
}

impl Client {
    /// Creates a new client with the given client ID.
    #[must_use]
    pub fn new(realm_id: Uuid, client_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            realm_id,
            client_id: client_id.into(),
            name: None,
            enabled: true,
            created_at: now,
            updated_at: now,
            protocol: Protocol::default(),
            secret: None,
            public_client: false,
            not_before: 0,
            allowed_claims_mask: 0,
            redirect_uris: HashSet::new(),
            web_origins: HashSet::new(),
            frontchannel_logout: false,
            full_scope_allowed: false,
            allowed_identity_providers: Vec::new(),
            protocol_claim_mappings: Vec::new(),
            attributes: HashMap::new(),
        }
    }

    /// Creates a public client.
    #[must_use]
    pub fn new_public(realm_id: Uuid, client_id: impl Into<String>) -> Self {
        let mut client = Self::new(realm_id, client_id);
        client.public_client = true;
        client.secret = None;
        client
    }

    /// Creates a confidential client with a secret.
    #[must_use]
    pub fn new_confidential(
        realm_id: Uuid,
        client_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        let mut client = Self::new(realm_id, client_id);
        client.public_client = false;
        client.secret = Some(secret.into());
        client
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the protocol.
    #[must_use]
    pub const fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Adds a redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uris.insert(uri.into());
        self
    }

    /// Adds a web origin.
    #[must_use]
    pub fn with_web_origin(mut self, origin: impl Into<String>) -> Self {
        self.web_origins.insert(origin.into());
        self
    }

    /// Sets a custom attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Allows the client every role in the realm without scope mappings.
    #[must_use]
    pub const fn with_full_scope(mut self) -> Self {
        self.full_scope_allowed = true;
        self
    }
}
