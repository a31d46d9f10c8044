//! Authorization model error types.

use kc_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the client authorization model.
///
/// Unknown roles and unknown claim mappings are resolved silently where
/// they occur; only the cases below reach the caller.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// An identity provider named in an allow-list update does not exist.
    #[error("unknown identity provider: {0}")]
    UnknownIdentityProvider(String),

    /// A claim mapping id could not be resolved under the `reject` policy.
    #[error("unknown protocol claim mapping: {0}")]
    UnknownClaimMapping(String),

    /// The storage layer failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<AuthzError> for kc_core::Error {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::UnknownIdentityProvider(id) => {
                Self::NotFound(format!("identity provider '{id}'"))
            }
            AuthzError::UnknownClaimMapping(id) => {
                Self::NotFound(format!("protocol claim mapping '{id}'"))
            }
            AuthzError::Storage(storage) if storage.is_not_found() => {
                Self::NotFound(storage.to_string())
            }
            AuthzError::Storage(_) => Self::Internal,
        }
    }
}

/// Result type for authorization model operations.
pub type AuthzResult<T> = Result<T, AuthzError>;
