//! Configuration loader for the handoff tools.
//!
//! `defaults/handoff.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files,
//! environment variables and flags on top of those defaults via [`Loader`]
//! before deserializing into [`HandoffConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TOML: &str = include_str!("../defaults/handoff.default.toml");

/// Prefix of environment overrides, as in `HANDOFF_CONFLUENCE__TOKEN`.
pub const ENV_PREFIX: &str = "HANDOFF";

/// Top-level configuration consumed by the handoff tools.
#[derive(Debug, Clone, Deserialize)]
pub struct HandoffConfig {
    pub confluence: ConfluenceConfig,
    pub handoff: PageConfig,
    pub connectivity: ConnectivityConfig,
}

/// Where handoff pages live and how to reach them.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfluenceConfig {
    pub base_url: String,
    pub parent_page_id: String,
    pub space_key: String,
    pub token: String,
    pub timeout_secs: u64,
    /// Check the server certificate. Off only for self-signed internal wikis.
    pub verify_tls: bool,
    pub page_size: usize,
}

impl ConfluenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Space key for new pages, if one is configured.
    pub fn space_key(&self) -> Option<&str> {
        non_empty(&self.space_key)
    }
}

/// Page naming and the initial page body.
#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    pub manager_name: String,
    pub title_date_format: String,
    pub body_date_format: String,
    pub heading: String,
}

impl PageConfig {
    pub fn manager(&self) -> Option<&str> {
        non_empty(&self.manager_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectivityConfig {
    pub probe_url: String,
    pub timeout_secs: u64,
    pub interval_secs: u64,
}

impl ConnectivityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// A setting remote commands cannot run without.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required setting '{key}' (set it in handoff.toml or {env})")]
pub struct MissingSetting {
    pub key: &'static str,
    pub env: String,
}

impl HandoffConfig {
    /// Check the settings every store operation needs, reporting the first gap.
    pub fn require_remote(&self) -> Result<(), MissingSetting> {
        let required = [
            ("confluence.base_url", &self.confluence.base_url),
            ("confluence.parent_page_id", &self.confluence.parent_page_id),
            ("confluence.token", &self.confluence.token),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((key, _)) => Err(MissingSetting {
                key: *key,
                env: env_var_for(key),
            }),
            None => Ok(()),
        }
    }

    /// URL polled while waiting for the network; falls back to the wiki root.
    pub fn probe_url(&self) -> &str {
        non_empty(&self.connectivity.probe_url).unwrap_or(&self.confluence.base_url)
    }
}

/// Environment variable that overrides `key`, e.g. `HANDOFF_CONFLUENCE__TOKEN`.
pub fn env_var_for(key: &str) -> String {
    format!("{ENV_PREFIX}_{}", key.replace('.', "__").to_uppercase())
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer `HANDOFF_*` environment variables, sections split on `__`.
    pub fn with_environment(self) -> Self {
        self.with_env_source(environment())
    }

    fn with_env_source(mut self, env: Environment) -> Self {
        self.builder = self.builder.add_source(env);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<HandoffConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<HandoffConfig, ConfigError> {
    Loader::new().build()
}
