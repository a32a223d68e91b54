//! The single-client registry.
//!
//! This deployment trusts exactly one OAuth client, the support portal,
//! registered at startup from validated configuration.

use sha2::{Digest, Sha256};

use crate::config::{ConfigError, SupportConfig};
use crate::types::Client;

/// Registry holding the one trusted client.
///
/// Populated once at startup; immutable and freely shareable afterwards.
#[derive(Debug, Clone)]
pub struct ClientRegistry {
    client: Client,
}

impl ClientRegistry {
    /// Builds the registry from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPortalUrl` if the redirect domain cannot be derived
    /// from `support_portal_url`.
    pub fn from_config(config: &SupportConfig) -> Result<Self, ConfigError> {
        let redirect_domain = config.redirect_domain()?;
        tracing::debug!(
            client_id = %config.client_id,
            redirect_domain = %redirect_domain,
            "Registered support OAuth client"
        );
        Ok(Self {
            client: Client {
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
                redirect_domain,
            },
        })
    }

    /// Looks up a client by id.
    #[must_use]
    pub fn lookup(&self, client_id: &str) -> Option<&Client> {
        (self.client.client_id == client_id).then_some(&self.client)
    }

    /// Verifies a presented client secret.
    ///
    /// Compares SHA-256 digests rather than the raw strings, so the
    /// comparison does not short-circuit on the first differing secret byte.
    /// Returns `false` for unknown clients.
    #[must_use]
    pub fn verify_secret(&self, client_id: &str, presented: &str) -> bool {
        let Some(client) = self.lookup(client_id) else {
            return false;
        };
        let expected = Sha256::digest(client.client_secret.as_bytes());
        let provided = Sha256::digest(presented.as_bytes());
        expected == provided
    }
}
