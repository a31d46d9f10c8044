//! Identity provider references.
//!
//! A client only needs to know which brokered identity providers it may use
//! for federated login, so the model carries a thin reference rather than
//! the provider's full configuration.

use serde::{Deserialize, Serialize};

/// Reference to a realm identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityProviderRef {
    /// Provider identifier (the alias, unique within a realm).
    pub id: String,
    /// Provider type (e.g., "oidc", "saml", "github").
    pub provider_type: String,
    /// Whether the provider is enabled.
    pub enabled: bool,
}

impl IdentityProviderRef {
    /// Creates an enabled provider reference.
    #[must_use]
    pub fn new(id: impl Into<String>, provider_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            provider_type: provider_type.into(),
            enabled: true,
        }
    }
}
