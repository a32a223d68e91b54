//! Server configuration loading.
//!
//! Configuration merges a TOML file (default `deskgate.toml`) with
//! `DESKGATE`-prefixed environment overrides, e.g.
//! `DESKGATE__SUPPORT__CLIENT_ID=...`. The merged configuration is
//! validated before the server binds its listener; any violation is fatal.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use deskgate_auth::{ConfigError, SupportConfig};

/// Root server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listen address, e.g. "127.0.0.1:8085".
    pub listen: String,

    /// Support OAuth client and grant lifetimes.
    pub support: SupportConfig,

    /// Account service collaborator.
    pub account_service: AccountServiceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8085".to_string(),
            support: SupportConfig::default(),
            account_service: AccountServiceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Validates the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns the first violation found. Validation failures prevent the
    /// server from starting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.support.validate()?;

        if self.account_service.base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "account_service.base_url",
            });
        }
        Url::parse(&self.account_service.base_url).map_err(|e| ConfigError::Load {
            message: format!("account_service.base_url is invalid: {e}"),
        })?;
        Ok(())
    }
}

/// Account service client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountServiceConfig {
    /// Base URL of the portal's account service.
    pub base_url: String,

    /// Per-request timeout for account lookups. A timed-out lookup is an
    /// upstream error, never an indefinite hang.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9000".to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Loads, completes, and validates the configuration.
///
/// Unset client credentials are filled with generated values before
/// validation, so only the portal URL and mailbox id are hard requirements
/// on a fresh deployment.
///
/// # Errors
///
/// Returns `ConfigError` if the file/environment sources cannot be read or
/// deserialized, or if validation rejects the merged configuration.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    let path = PathBuf::from(path.unwrap_or("deskgate.toml"));
    if path.exists() {
        builder = builder.add_source(File::from(path));
    }
    // Environment overrides, e.g. DESKGATE__SUPPORT__MAILBOX_ID=12
    builder = builder.add_source(
        Environment::with_prefix("DESKGATE")
            .try_parsing(true)
            .separator("__"),
    );

    let merged = builder.build().map_err(|e| ConfigError::Load {
        message: e.to_string(),
    })?;
    let mut config: AppConfig = merged.try_deserialize().map_err(|e| ConfigError::Load {
        message: e.to_string(),
    })?;

    config.support.ensure_credentials();
    config.validate()?;
    Ok(config)
}
