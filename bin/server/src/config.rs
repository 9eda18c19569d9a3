//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server, loaded
//! via the `config` crate from an optional `fieldgate.toml` file and from
//! `FIELDGATE__`-prefixed environment variables (nested keys separated by
//! `__`, e.g. `FIELDGATE__TOKEN__TTL_MINUTES=30`).
//!
//! Gate overrides change the required role of a protected field:
//!
//! ```toml
//! [[gates]]
//! field = "Query.users"
//! required_role = "auditor"
//! ```

use fieldgate_access_gate::CanAccess;
use rootcause::Report;
use serde::Deserialize;
use std::path::Path;

use crate::error::StartupError;

/// Base name of the optional configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "fieldgate";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FIELDGATE";

/// Longest token lifetime accepted, in minutes (one year).
pub const MAX_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Server configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Access token configuration.
    #[serde(default)]
    pub token: TokenConfig,

    /// Overrides for `@canAccess` on protected fields.
    #[serde(default)]
    pub gates: Vec<CanAccess>,

    /// Accounts provisioned at startup.
    #[serde(default)]
    pub seed_users: Vec<SeedUser>,
}

/// Access token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// Lifetime of issued tokens, in minutes.
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,

    /// Interval between expired-token purges, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
}

/// An account created at startup, optionally with a known token secret.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role names.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Bearer secret to provision for the account.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_ttl_minutes() -> i64 {
    24 * 60
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
        }
    }
}

impl TokenConfig {
    /// Returns the token lifetime.
    #[must_use]
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.ttl_minutes)
    }

    /// Checks that the lifetime and cleanup interval are usable.
    ///
    /// # Errors
    ///
    /// `StartupError::Config` if `ttl_minutes` is not in
    /// `1..=MAX_TTL_MINUTES` or `cleanup_interval_seconds` is zero.
    pub fn validate(&self) -> Result<(), Report<StartupError>> {
        if !(1..=MAX_TTL_MINUTES).contains(&self.ttl_minutes) {
            return Err(StartupError::Config {
                details: format!(
                    "token.ttl_minutes must be between 1 and {MAX_TTL_MINUTES}, got {}",
                    self.ttl_minutes
                ),
            }
            .into());
        }
        if self.cleanup_interval_seconds == 0 {
            return Err(StartupError::Config {
                details: "token.cleanup_interval_seconds must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl ServerConfig {
    /// Loads configuration from `fieldgate.{toml,json,yaml}` in the working
    /// directory, if present, and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is malformed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
    }

    /// Loads configuration from the given file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or configuration is malformed.
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
