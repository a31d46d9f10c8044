//! End-to-end integration tests.
//!
//! These tests drive the client authorization model against in-memory
//! providers, reloading models between steps the way a request-scoped
//! caller would.

mod common;
mod claim_mappings;
mod client_model;
mod identity_providers;
mod scope_mappings;
