//! Identity provider allow-list of a client.

use kc_core::UnknownIdPolicy;
use kc_model::IdentityProviderRef;
use kc_storage::StorageResult;

use crate::error::{AuthzError, AuthzResult};
use crate::reconcile::{self, ReconcileError, ReconcileOutcome};

/// Identity providers a client may use for federated login.
///
/// An empty list is a sentinel for "every provider is allowed", not "none".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityProviderAllowList {
    providers: Vec<IdentityProviderRef>,
}

impl IdentityProviderAllowList {
    /// Creates an allow-list from stored provider references.
    #[must_use]
    pub const fn new(providers: Vec<IdentityProviderRef>) -> Self {
        Self { providers }
    }

    /// Returns the allowed provider ids, in stored order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.id.clone()).collect()
    }

    /// Returns copies of the allowed provider references.
    #[must_use]
    pub fn providers(&self) -> Vec<IdentityProviderRef> {
        self.providers.clone()
    }

    /// Returns `true` if no provider is listed (every provider allowed).
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.providers.is_empty()
    }

    /// Checks whether the client may log in through `provider_id`.
    ///
    /// Always `true` while the list is empty.
    #[must_use]
    pub fn has_identity_provider(&self, provider_id: &str) -> bool {
        self.is_unrestricted() || self.providers.iter().any(|p| p.id == provider_id)
    }

    /// Replaces the allow-list with the providers named in `desired`.
    ///
    /// ## Errors
    ///
    /// Returns `AuthzError::UnknownIdentityProvider` if any id does not
    /// resolve, and `AuthzError::Storage` if the lookup fails. The list is
    /// unchanged on error.
    pub fn update<L>(
        &mut self,
        desired: &[String],
        lookup: L,
    ) -> AuthzResult<ReconcileOutcome<String>>
    where
        L: FnMut(&String) -> StorageResult<Option<IdentityProviderRef>>,
    {
        reconcile::reconcile(
            &mut self.providers,
            desired,
            |p| p.id.clone(),
            lookup,
            UnknownIdPolicy::Reject,
        )
        .map_err(|e| match e {
            ReconcileError::UnknownId(id) => AuthzError::UnknownIdentityProvider(id),
            ReconcileError::Lookup(storage) => AuthzError::Storage(storage),
        })
    }
}
