//! # kc-model
//!
//! Domain models for the client authorization surface (Client, Role,
//! identity provider references, protocol claim mappings).
//!
//! This crate defines plain data entities; the decision logic built on top
//! of them lives in `kc-authz`.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod claim_mapping;
pub mod client;
pub mod identity_provider;
pub mod role;

pub use claim_mapping::{ClaimSource, ParseClaimSourceError, ProtocolClaimMapping};
pub use client::{Client, Protocol};
pub use identity_provider::IdentityProviderRef;
pub use role::{Role, RoleContainer};
