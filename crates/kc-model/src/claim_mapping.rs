//! Protocol claim mapping domain model.
//!
//! A claim mapping describes how one output claim of a protocol token is
//! sourced, e.g. the `email` claim from the user's email property or the
//! `groups` claim from realm roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::client::Protocol;

/// Where the value of a mapped claim comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimSource {
    /// A property of the user model itself (username, email, ...).
    UserModel,
    /// A custom user attribute.
    UserAttribute,
    /// A user property resolved through a getter.
    UserProperty,
    /// A note stored on the user session.
    UserSessionNote,
    /// Realm roles held by the user.
    RealmRole,
    /// Client roles held by the user.
    ClientRole,
    /// A fixed value configured on the mapping.
    Hardcoded,
}

impl ClaimSource {
    /// All sources, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::UserModel,
        Self::UserAttribute,
        Self::UserProperty,
        Self::UserSessionNote,
        Self::RealmRole,
        Self::ClientRole,
        Self::Hardcoded,
    ];

    /// Returns the stable string form of the source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserModel => "user-model",
            Self::UserAttribute => "user-attribute",
            Self::UserProperty => "user-property",
            Self::UserSessionNote => "user-session-note",
            Self::RealmRole => "realm-role",
            Self::ClientRole => "client-role",
            Self::Hardcoded => "hardcoded",
        }
    }
}

impl fmt::Display for ClaimSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored claim source string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown claim source: {0}")]
pub struct ParseClaimSourceError(pub String);

impl FromStr for ClaimSource {
    type Err = ParseClaimSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| ParseClaimSourceError(s.to_string()))
    }
}

/// A protocol claim mapping.
///
/// Values of this type are snapshots: they are handed out by copy and never
/// alias the catalog they were read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtocolClaimMapping {
    /// Unique identifier.
    pub id: Uuid,
    /// Mapping name (user-defined).
    pub name: String,
    /// Protocol family the mapping applies to.
    pub protocol: Protocol,
    /// Name of the claim written to the token.
    pub protocol_claim: String,
    /// Whether new clients get this mapping without asking.
    pub applied_by_default: bool,
    /// Where the claim value is sourced from.
    pub source: ClaimSource,
    /// Source-specific selector (attribute name, property, literal value...).
    pub source_attribute: String,
}

impl ProtocolClaimMapping {
    /// Creates a new mapping for the given protocol claim.
    #[must_use]
    pub fn new(
        protocol: Protocol,
        protocol_claim: impl Into<String>,
        source: ClaimSource,
        source_attribute: impl Into<String>,
    ) -> Self {
        let protocol_claim = protocol_claim.into();
        Self {
            id: Uuid::now_v7(),
            name: protocol_claim.clone(),
            protocol,
            protocol_claim,
            applied_by_default: false,
            source,
            source_attribute: source_attribute.into(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks the mapping as applied by default.
    #[must_use]
    pub const fn applied_by_default(mut self) -> Self {
        self.applied_by_default = true;
        self
    }
}
