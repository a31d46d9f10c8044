//! Protocol claim mappings attached to a client.

use kc_core::UnknownIdPolicy;
use kc_model::{Protocol, ProtocolClaimMapping};
use kc_storage::StorageResult;
use uuid::Uuid;

use crate::error::{AuthzError, AuthzResult};
use crate::reconcile::{self, ReconcileError, ReconcileOutcome};

/// Per-client catalog of protocol claim mappings.
///
/// Every read returns owned snapshots; the catalog only changes through
/// its add and remove operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimMappingCatalog {
    mappings: Vec<ProtocolClaimMapping>,
}

impl ClaimMappingCatalog {
    /// Creates a catalog from stored mappings.
    #[must_use]
    pub const fn new(mappings: Vec<ProtocolClaimMapping>) -> Self {
        Self { mappings }
    }

    /// Returns snapshots of all attached mappings.
    #[must_use]
    pub fn list(&self) -> Vec<ProtocolClaimMapping> {
        self.mappings.clone()
    }

    /// Returns a snapshot of the mapping with `id`, if attached.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<ProtocolClaimMapping> {
        self.mappings.iter().find(|m| m.id == id).cloned()
    }

    /// Checks whether a mapping with `id` is attached.
    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.mappings.iter().any(|m| m.id == id)
    }

    /// Returns the attached mappings for one protocol.
    #[must_use]
    pub fn for_protocol(&self, protocol: Protocol) -> Vec<ProtocolClaimMapping> {
        self.mappings
            .iter()
            .filter(|m| m.protocol == protocol)
            .cloned()
            .collect()
    }

    /// Returns the attached mappings flagged as applied by default.
    #[must_use]
    pub fn applied_by_default(&self) -> Vec<ProtocolClaimMapping> {
        self.mappings
            .iter()
            .filter(|m| m.applied_by_default)
            .cloned()
            .collect()
    }

    /// Returns the number of attached mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns `true` if nothing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Attaches the mappings named in `ids` that are not attached yet.
    ///
    /// Ids are mapping UUIDs in string form. An id that does not parse is
    /// unknown, just like one that does not resolve. Under
    /// `UnknownIdPolicy::Skip` unknown ids are ignored and reported in the
    /// outcome.
    ///
    /// ## Errors
    ///
    /// Returns `AuthzError::UnknownClaimMapping` for an unknown id under
    /// `UnknownIdPolicy::Reject`, and `AuthzError::Storage` if the lookup
    /// fails. Nothing is attached on error.
    pub fn add_by_ids<S, L>(
        &mut self,
        ids: &[S],
        lookup: L,
        policy: UnknownIdPolicy,
    ) -> AuthzResult<ReconcileOutcome<String>>
    where
        S: AsRef<str>,
        L: FnMut(&Uuid) -> StorageResult<Option<ProtocolClaimMapping>>,
    {
        let mut parsed = Vec::with_capacity(ids.len());
        let mut malformed = Vec::new();
        for raw in ids {
            let raw = raw.as_ref();
            match Uuid::parse_str(raw) {
                Ok(id) => parsed.push(id),
                Err(_) if policy == UnknownIdPolicy::Reject => {
                    return Err(AuthzError::UnknownClaimMapping(raw.to_string()));
                }
                Err(_) => {
                    tracing::debug!(id = raw, "Malformed claim mapping id ignored");
                    malformed.push(raw.to_string());
                }
            }
        }

        let outcome = reconcile::attach(&mut self.mappings, &parsed, |m| m.id, lookup, policy)
            .map_err(|e| match e {
                ReconcileError::UnknownId(id) => AuthzError::UnknownClaimMapping(id),
                ReconcileError::Lookup(storage) => AuthzError::Storage(storage),
            })?;

        Ok(ReconcileOutcome {
            added: outcome.added.iter().map(Uuid::to_string).collect(),
            removed: Vec::new(),
            skipped: outcome
                .skipped
                .iter()
                .map(Uuid::to_string)
                .chain(malformed)
                .collect(),
        })
    }

    /// Detaches every attached mapping whose id is in `ids`.
    ///
    /// Ids that do not parse or are not attached are ignored. Returns the ids
    /// actually detached.
    pub fn remove_by_ids<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<Uuid> {
        let parsed: Vec<Uuid> = ids
            .iter()
            .filter_map(|raw| Uuid::parse_str(raw.as_ref()).ok())
            .collect();
        reconcile::detach(&mut self.mappings, &parsed, |m| m.id)
    }

    /// Attaches a mapping directly. Returns `false` if its id is already
    /// attached.
    pub fn add(&mut self, mapping: ProtocolClaimMapping) -> bool {
        if self.contains(mapping.id) {
            return false;
        }
        self.mappings.push(mapping);
        true
    }

    /// Detaches the mapping with `id`, returning it if it was attached.
    pub fn remove(&mut self, id: Uuid) -> Option<ProtocolClaimMapping> {
        let index = self.mappings.iter().position(|m| m.id == id)?;
        Some(self.mappings.remove(index))
    }
}
