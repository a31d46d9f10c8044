//! # kc-core
//!
//! Core utilities, configuration, and error handling shared by the client
//! authorization crates.
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - AU-2: Event logging framework
//! - SI-11: Error handling

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod event;
pub mod logging;

pub use config::{AuthzConfig, Config, LoggingConfig, UnknownIdPolicy};
pub use error::{Error, Result};
