//! Environment-driven configuration.
//!
//! Each configuration domain ([`WebServiceConfig`], [`DatabaseConfig`]) is a
//! plain record populated from an [`EnvSource`]. A domain is wrapped in a
//! [`Configuration`] that tracks whether it has been loaded; the
//! [`ConfigurationRegistry`] owns exactly one `Configuration` per domain.
//!
//! Loading never fails. Missing numeric values fall back to documented
//! defaults and missing secrets are only reported when a dependent service
//! asks for them, so "loaded" does not imply "valid". Call
//! [`ConfigurationRegistry::validate`] for the fields startup cannot do
//! without.

mod database;
mod registry;
mod web_service;

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

pub use database::{DatabaseConfig, DbSettings};
pub use registry::ConfigurationRegistry;
pub use web_service::{EmailSettings, JwtSettings, WebServiceConfig};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The domain was read before `load_environment_vars` ran.
    #[error("{domain} are not loaded")]
    NotLoaded { domain: &'static str },

    /// A value required by startup or by a service is absent or empty.
    #[error("{domain}: required value `{field}` is missing")]
    MissingField {
        domain: &'static str,
        field: &'static str,
    },

    /// A value is present but cannot be used.
    #[error("{domain}: value of `{field}` is invalid: {reason}")]
    InvalidValue {
        domain: &'static str,
        field: &'static str,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Environment source
// ---------------------------------------------------------------------------

/// Read-only view of environment variables.
pub trait EnvSource: Send + Sync {
    /// Raw value of `key`, or `None` when it is not set.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for HashMap<&'static str, &'static str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| (*v).to_string())
    }
}

/// Non-empty string value of `key`. Empty strings count as unset.
pub(crate) fn string_var(env: &dyn EnvSource, key: &str) -> Option<String> {
    env.var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Non-zero numeric value of `key`, or `default`.
///
/// A value that is set but does not parse (or parses to zero) logs a
/// warning and yields `default`; it never propagates an error.
pub(crate) fn numeric_var<T>(env: &dyn EnvSource, key: &str, default: T) -> T
where
    T: FromStr + PartialEq + Default + Display + Copy,
{
    let Some(raw) = string_var(env, key) else {
        return default;
    };

    match raw.parse::<T>() {
        Ok(value) if value != T::default() => value,
        _ => {
            tracing::warn!(
                source = "Configurations",
                variable = key,
                value = %raw,
                fallback = %default,
                "Invalid numeric environment value, using default"
            );
            default
        }
    }
}

// ---------------------------------------------------------------------------
// Domain lifecycle
// ---------------------------------------------------------------------------

/// A named bundle of settings read from the environment.
pub trait ConfigDomain: Default {
    /// Human-readable domain name used in logs and errors.
    const NAME: &'static str;

    /// Build the record from raw environment values, applying defaults.
    fn from_env(env: &dyn EnvSource) -> Self;

    /// Check the fields startup cannot proceed without.
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Whether a domain's environment variables have been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
}

/// Result of a call to [`Configuration::load_environment_vars`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Values were read and stored.
    Loaded,
    /// The domain was already loaded; nothing changed.
    AlreadyLoaded,
}

/// One configuration domain together with its load state.
///
/// `load_environment_vars` takes `&mut self`, so the owner is the only
/// writer and the values are mutated at most once.
#[derive(Debug)]
pub struct Configuration<D> {
    state: LoadState,
    values: D,
}

impl<D: ConfigDomain> Configuration<D> {
    pub fn new() -> Self {
        Self {
            state: LoadState::Unloaded,
            values: D::default(),
        }
    }

    /// Read the domain from `env`. A second call is a no-op that warns.
    pub fn load_environment_vars(&mut self, env: &dyn EnvSource) -> LoadOutcome {
        if self.state == LoadState::Loaded {
            tracing::warn!(source = D::NAME, "Environment vars are already loaded.");
            return LoadOutcome::AlreadyLoaded;
        }

        self.values = D::from_env(env);
        self.state = LoadState::Loaded;

        tracing::info!(
            source = D::NAME,
            "Environment vars are loaded correctly: Configurations are set."
        );
        LoadOutcome::Loaded
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// The loaded values, or [`ConfigError::NotLoaded`].
    pub fn get(&self) -> Result<&D, ConfigError> {
        match self.state {
            LoadState::Loaded => Ok(&self.values),
            LoadState::Unloaded => Err(ConfigError::NotLoaded { domain: D::NAME }),
        }
    }
}

impl<D: ConfigDomain> Default for Configuration<D> {
    fn default() -> Self {
        Self::new()
    }
}
