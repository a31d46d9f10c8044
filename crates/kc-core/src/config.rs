//! Configuration management for the client authorization model.
//!
//! Configuration is plain serde data with sensible defaults and can be
//! overridden from environment variables.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default cap on role composition depth followed during containment checks.
pub const DEFAULT_MAX_ROLE_DEPTH: usize = 64;

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Authorization model configuration.
    #[serde(default)]
    pub authz: AuthzConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            authz: AuthzConfig::from_env()?,
            logging: LoggingConfig::from_env(),
        })
    }
}

/// How reconciliation treats an identifier that the lookup cannot resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownIdPolicy {
    /// Ignore the identifier and continue with the rest.
    #[default]
    Skip,
    /// Abort the whole operation without applying any change.
    Reject,
}

impl FromStr for UnknownIdPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "reject" => Ok(Self::Reject),
            other => Err(Error::Config(format!(
                "unknown id policy '{other}' (expected 'skip' or 'reject')"
            ))),
        }
    }
}

/// Authorization model configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthzConfig {
    /// Maximum depth followed through composite roles.
    ///
    /// Branches deeper than this are cut, so a misconfigured role graph
    /// yields a bounded result instead of an unbounded walk.
    #[serde(default = "default_max_role_depth")]
    pub max_role_depth: usize,

    /// Policy for unknown ids when attaching protocol claim mappings.
    ///
    /// Identity provider reconciliation always rejects unknown ids.
    #[serde(default)]
    pub claim_mapping_unknown_ids: UnknownIdPolicy,
}

const fn default_max_role_depth() -> usize {
    DEFAULT_MAX_ROLE_DEPTH
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            max_role_depth: DEFAULT_MAX_ROLE_DEPTH,
            claim_mapping_unknown_ids: UnknownIdPolicy::default(),
        }
    }
}

impl AuthzConfig {
    /// Loads configuration from `KC_AUTHZ_*` environment variables.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration using the given variable lookup.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` if a variable is set to an unparsable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("KC_AUTHZ_MAX_ROLE_DEPTH") {
            let depth: usize = raw.trim().parse().map_err(|_| {
                Error::Config(format!("KC_AUTHZ_MAX_ROLE_DEPTH must be an integer, got '{raw}'"))
            })?;
            if depth == 0 {
                return Err(Error::Config(
                    "KC_AUTHZ_MAX_ROLE_DEPTH must be at least 1".to_string(),
                ));
            }
            config.max_role_depth = depth;
        }

        if let Some(raw) = lookup("KC_AUTHZ_CLAIM_MAPPING_UNKNOWN_IDS") {
            config.claim_mapping_unknown_ids = raw.parse()?;
        }

        Ok(config)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber` env-filter directive.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Loads configuration from `RUST_LOG` and `KC_LOG_JSON`.
    #[must_use]
    pub fn from_env() -> Self {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_log_filter());
        let json = std::env::var("KC_LOG_JSON")
            .map(|v| matches!(v.as_str(), "1" | "true"))
            .unwrap_or(false);
        Self { filter, json }
    }
}
