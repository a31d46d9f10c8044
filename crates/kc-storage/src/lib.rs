//! # kc-storage
//!
//! Storage abstraction traits consumed by the client authorization model.
//!
//! The authorization core never talks to a database directly. It resolves
//! roles, identity providers and claim mappings through the lookup traits
//! below and persists scope-mapping edges through [`ScopeMappingProvider`].
//! Concrete backends implement these traits; [`memory`] provides in-process
//! implementations for tests and embedding.
//!
//! ## Provider Traits
//!
//! - [`RoleProvider`] - role lookup by id within a realm
//! - [`IdentityProviderProvider`] - identity provider lookup by id
//! - [`ClaimMappingProvider`] - protocol claim mapping lookup by id
//! - [`ScopeMappingProvider`] - scope-mapping edge persistence

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod claim_mapping;
pub mod error;
pub mod identity_provider;
pub mod memory;
pub mod role;
pub mod scope_mapping;

pub use claim_mapping::ClaimMappingProvider;
pub use error::{StorageError, StorageResult};
pub use identity_provider::IdentityProviderProvider;
pub use role::RoleProvider;
pub use scope_mapping::ScopeMappingProvider;
