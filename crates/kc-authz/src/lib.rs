//! # kc-authz
//!
//! Authorization surface of a single client within a realm.
//!
//! This crate answers "may this client act under this role" and keeps the
//! client's allow-lists consistent:
//!
//! - [`RoleGraph`] - transitive role containment over the realm's roles
//! - [`ScopeMappingSet`] - roles directly granted to a client
//! - [`reconcile`] - diff/apply of desired ids against an owned collection
//! - [`IdentityProviderAllowList`] - identity providers usable for login
//! - [`ClaimMappingCatalog`] - protocol claim mappings attached to a client
//! - [`ClientAuthorizationModel`] - the aggregate tying them together
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut model = ClientAuthorizationModel::load(client, collaborators, &config)?;
//! model.add_scope_mapping(&admin)?;
//! assert!(model.has_scope(&viewer));
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod claim_mapping;
pub mod client;
pub mod error;
pub mod identity_provider;
pub mod reconcile;
pub mod role_graph;
pub mod scope_mapping;

pub use claim_mapping::ClaimMappingCatalog;
pub use client::{ClientAuthorizationModel, Collaborators};
pub use error::{AuthzError, AuthzResult};
pub use identity_provider::IdentityProviderAllowList;
pub use reconcile::{ReconcileError, ReconcileOutcome};
pub use role_graph::RoleGraph;
pub use scope_mapping::ScopeMappingSet;
