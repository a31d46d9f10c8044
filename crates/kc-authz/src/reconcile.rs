//! Allow-list reconciliation.
//!
//! Brings an owned collection of entities in line with a list of desired
//! ids: entities whose id is not desired are dropped, desired ids that are
//! not present yet are resolved through a lookup and appended.
//!
//! Every lookup happens before the collection is touched, so a failed
//! reconciliation leaves the collection exactly as it was.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use kc_core::UnknownIdPolicy;
use kc_storage::{StorageError, StorageResult};
use thiserror::Error;

/// Errors that abort a reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A desired id did not resolve and the policy is `reject`.
    #[error("unknown id: {0}")]
    UnknownId(String),

    /// The lookup itself failed.
    #[error(transparent)]
    Lookup(#[from] StorageError),
}

/// What a reconciliation changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome<K> {
    /// Ids that were resolved and appended.
    pub added: Vec<K>,
    /// Ids whose entities were dropped.
    pub removed: Vec<K>,
    /// Desired ids that did not resolve and were ignored.
    pub skipped: Vec<K>,
}

impl<K> Default for ReconcileOutcome<K> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<K> ReconcileOutcome<K> {
    /// Returns `true` if the collection was not modified.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Replaces the contents of `current` with the entities for `desired`.
///
/// Entities already present are kept in place. Unknown ids are handled per
/// `policy`; lookup failures always abort.
///
/// ## Errors
///
/// Returns `ReconcileError::UnknownId` for an unresolvable id under
/// `UnknownIdPolicy::Reject` and `ReconcileError::Lookup` when the lookup
/// fails. `current` is unchanged in both cases.
pub fn reconcile<T, K, KeyFn, LookupFn>(
    current: &mut Vec<T>,
    desired: &[K],
    key_of: KeyFn,
    lookup: LookupFn,
    policy: UnknownIdPolicy,
) -> Result<ReconcileOutcome<K>, ReconcileError>
where
    K: Eq + Hash + Clone + Display,
    KeyFn: Fn(&T) -> K,
    LookupFn: FnMut(&K) -> StorageResult<Option<T>>,
{
    let wanted: HashSet<&K> = desired.iter().collect();

    let mut kept: HashSet<K> = HashSet::new();
    let mut removed: Vec<K> = Vec::new();
    for item in current.iter() {
        let key = key_of(item);
        if wanted.contains(&key) {
            kept.insert(key);
        } else {
            removed.push(key);
        }
    }

    let (additions, skipped) = stage(&kept, desired, lookup, policy)?;

    current.retain(|item| wanted.contains(&key_of(item)));
    let added = apply(current, additions);

    Ok(ReconcileOutcome {
        added,
        removed,
        skipped,
    })
}

/// Appends the entities for the ids in `ids` that are not yet present.
///
/// Nothing is dropped. Already present ids are no-ops.
///
/// ## Errors
///
/// Same as [`reconcile`]; `current` is unchanged on error.
pub fn attach<T, K, KeyFn, LookupFn>(
    current: &mut Vec<T>,
    ids: &[K],
    key_of: KeyFn,
    lookup: LookupFn,
    policy: UnknownIdPolicy,
) -> Result<ReconcileOutcome<K>, ReconcileError>
where
    K: Eq + Hash + Clone + Display,
    KeyFn: Fn(&T) -> K,
    LookupFn: FnMut(&K) -> StorageResult<Option<T>>,
{
    let present: HashSet<K> = current.iter().map(&key_of).collect();
    let (additions, skipped) = stage(&present, ids, lookup, policy)?;
    let added = apply(current, additions);

    Ok(ReconcileOutcome {
        added,
        removed: Vec::new(),
        skipped,
    })
}

/// Drops every entity whose id is listed in `ids`.
///
/// Ids that are not present are no-ops. Returns the ids actually removed.
pub fn detach<T, K, KeyFn>(current: &mut Vec<T>, ids: &[K], key_of: KeyFn) -> Vec<K>
where
    K: Eq + Hash,
    KeyFn: Fn(&T) -> K,
{
    let unwanted: HashSet<&K> = ids.iter().collect();
    let mut removed = Vec::new();
    current.retain(|item| {
        let key = key_of(item);
        if unwanted.contains(&key) {
            removed.push(key);
            false
        } else {
            true
        }
    });
    removed
}

type Staged<K, T> = (Vec<(K, T)>, Vec<K>);

/// Resolves the ids in `desired` that are not in `present`, in order and
/// without duplicates.
fn stage<T, K, LookupFn>(
    present: &HashSet<K>,
    desired: &[K],
    mut lookup: LookupFn,
    policy: UnknownIdPolicy,
) -> Result<Staged<K, T>, ReconcileError>
where
    K: Eq + Hash + Clone + Display,
    LookupFn: FnMut(&K) -> StorageResult<Option<T>>,
{
    let mut seen: HashSet<&K> = HashSet::new();
    let mut additions = Vec::new();
    let mut skipped = Vec::new();

    for key in desired {
        if present.contains(key) || !seen.insert(key) {
            continue;
        }
        match lookup(key)? {
            Some(item) => additions.push((key.clone(), item)),
            None => match policy {
                UnknownIdPolicy::Reject => return Err(ReconcileError::UnknownId(key.to_string())),
                UnknownIdPolicy::Skip => {
                    tracing::debug!(id = %key, "Unknown id ignored during reconciliation");
                    skipped.push(key.clone());
                }
            },
        }
    }

    Ok((additions, skipped))
}

fn apply<T, K>(current: &mut Vec<T>, additions: Vec<(K, T)>) -> Vec<K> {
    let mut added = Vec::with_capacity(additions.len());
    for (key, item) in additions {
        current.push(item);
        added.push(key);
    }
    added
}
