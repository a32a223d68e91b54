//! Support OAuth configuration and startup validation.
//!
//! Configuration errors are fatal: the server validates before binding the
//! listener, so a missing client id or a non-numeric mailbox id prevents
//! start instead of failing at request time.
//!
//! # Example (TOML)
//!
//! ```toml
//! [support]
//! client_id = "4f9c1c4e-1b9a-4b7e-9a6d-0f0a4c1d2e3f"
//! client_secret = "..."
//! support_portal_url = "https://support.example.com"
//! mailbox_id = "12"
//!
//! [support.oauth]
//! authorization_code_lifetime = "10m"
//! access_token_lifetime = "2h"
//! refresh_token_lifetime = "72h"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Errors produced by configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required configuration field is unset.
    #[error("{field} is required")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The support portal URL does not parse or has no host.
    #[error("support_portal_url is invalid: {message}")]
    InvalidPortalUrl {
        /// Description of the parse failure.
        message: String,
    },

    /// The mailbox id is not an unsigned integer.
    #[error("mailbox_id must be a valid number, got {value:?}")]
    InvalidMailboxId {
        /// The rejected value.
        value: String,
    },

    /// The configuration source could not be read or deserialized.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Description of the load failure.
        message: String,
    },
}

/// Configuration for the support-portal OAuth client and grant lifetimes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportConfig {
    /// OAuth client id of the support portal. Generated when unset.
    pub client_id: String,

    /// OAuth client secret of the support portal. Generated when unset.
    pub client_secret: String,

    /// Public URL of the support portal; its host becomes the redirect
    /// domain that authorization redirect URIs must match.
    pub support_portal_url: String,

    /// Identifier of the support mailbox tickets are filed into.
    /// Kept as a string in configuration; must parse as `u64`.
    pub mailbox_id: String,

    /// Grant lifetimes.
    pub oauth: OAuthConfig,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            support_portal_url: String::new(),
            mailbox_id: String::new(),
            oauth: OAuthConfig::default(),
        }
    }
}

impl SupportConfig {
    /// Fills unset client credentials with freshly generated values.
    ///
    /// `client_id` becomes a random UUID and `client_secret` a 256-bit
    /// random value, matching first-run behavior: an operator who does not
    /// pin credentials gets a working (per-process) pair, while the portal
    /// URL and mailbox id still have to be configured explicitly.
    pub fn ensure_credentials(&mut self) {
        if self.client_id.is_empty() {
            self.client_id = Uuid::new_v4().to_string();
            tracing::info!(client_id = %self.client_id, "Generated support OAuth client id");
        }
        if self.client_secret.is_empty() {
            self.client_secret = generate_client_secret();
            tracing::info!("Generated support OAuth client secret");
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: a missing field, an unparseable
    /// portal URL, or a non-numeric mailbox id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.is_empty() {
            return Err(ConfigError::MissingField { field: "client_id" });
        }
        if self.client_secret.is_empty() {
            return Err(ConfigError::MissingField {
                field: "client_secret",
            });
        }
        if self.support_portal_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "support_portal_url",
            });
        }
        if self.mailbox_id.is_empty() {
            return Err(ConfigError::MissingField { field: "mailbox_id" });
        }
        self.redirect_domain()?;
        self.mailbox_id()?;
        Ok(())
    }

    /// Returns the redirect domain derived from the support portal URL.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPortalUrl` if the URL does not parse or has no host.
    pub fn redirect_domain(&self) -> Result<String, ConfigError> {
        let url =
            Url::parse(&self.support_portal_url).map_err(|e| ConfigError::InvalidPortalUrl {
                message: e.to_string(),
            })?;
        url.host_str()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::InvalidPortalUrl {
                message: "URL has no host".to_string(),
            })
    }

    /// Returns the mailbox id as an unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMailboxId` if the configured value is not a `u64`.
    pub fn mailbox_id(&self) -> Result<u64, ConfigError> {
        self.mailbox_id
            .parse()
            .map_err(|_| ConfigError::InvalidMailboxId {
                value: self.mailbox_id.clone(),
            })
    }
}

/// Grant lifetime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Authorization code lifetime. Codes should be short-lived.
    #[serde(with = "humantime_serde")]
    pub authorization_code_lifetime: Duration,

    /// Access token lifetime.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime.
    #[serde(with = "humantime_serde")]
    pub refresh_token_lifetime: Duration,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            authorization_code_lifetime: Duration::from_secs(600), // 10 minutes
            access_token_lifetime: Duration::from_secs(2 * 3600),  // 2 hours
            refresh_token_lifetime: Duration::from_secs(72 * 3600), // 72 hours
        }
    }
}

/// Generate a 256-bit random client secret, base64url-encoded.
#[must_use]
pub fn generate_client_secret() -> String {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let mut bytes = [0u8; 32];
    rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> SupportConfig {
        SupportConfig {
            client_id: "portal-client".to_string(),
            client_secret: "secret".to_string(),
            support_portal_url: "https://support.example.com".to_string(),
            mailbox_id: "12".to_string(),
            oauth: OAuthConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_rejected() {
        for field in ["client_id", "client_secret", "support_portal_url", "mailbox_id"] {
            let mut cfg = valid_config();
            match field {
                "client_id" => cfg.client_id.clear(),
                "client_secret" => cfg.client_secret.clear(),
                "support_portal_url" => cfg.support_portal_url.clear(),
                _ => cfg.mailbox_id.clear(),
            }
            let err = cfg.validate().unwrap_err();
            assert!(
                matches!(err, ConfigError::MissingField { field: f } if f == field),
                "expected missing-field error for {field}, got {err}"
            );
        }
    }

    #[test]
    fn test_non_numeric_mailbox_rejected() {
        let mut cfg = valid_config();
        cfg.mailbox_id = "tickets".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidMailboxId { .. })
        ));
    }

    #[test]
    fn test_malformed_portal_url_rejected() {
        let mut cfg = valid_config();
        cfg.support_portal_url = "not a url".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidPortalUrl { .. })
        ));
    }

    #[test]
    fn test_redirect_domain_is_host() {
        let cfg = valid_config();
        assert_eq!(cfg.redirect_domain().unwrap(), "support.example.com");
    }

    #[test]
    fn test_mailbox_id_parses() {
        assert_eq!(valid_config().mailbox_id().unwrap(), 12);
    }

    #[test]
    fn test_ensure_credentials_generates_when_unset() {
        let mut cfg = SupportConfig::default();
        cfg.ensure_credentials();
        assert!(!cfg.client_id.is_empty());
        assert!(!cfg.client_secret.is_empty());
        // But the portal URL and mailbox id are still required.
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_ensure_credentials_keeps_configured_values() {
        let mut cfg = valid_config();
        cfg.ensure_credentials();
        assert_eq!(cfg.client_id, "portal-client");
        assert_eq!(cfg.client_secret, "secret");
    }

    #[test]
    fn test_lifetimes_deserialize_from_humantime() {
        let cfg: OAuthConfig = toml_like(
            r#"{"authorization_code_lifetime":"10m","access_token_lifetime":"2h","refresh_token_lifetime":"72h"}"#,
        );
        assert_eq!(cfg.authorization_code_lifetime, Duration::from_secs(600));
        assert_eq!(cfg.access_token_lifetime, Duration::from_secs(7200));
        assert_eq!(cfg.refresh_token_lifetime, Duration::from_secs(259_200));
    }

    fn toml_like(json: &str) -> OAuthConfig {
        serde_json::from_str(json).unwrap()
    }
}
