//! The registered OAuth client.

use std::fmt;

use url::Url;

/// The single OAuth client trusted by this deployment (the support portal).
///
/// Built once at startup from validated configuration and immutable
/// afterwards. The redirect domain is the host of the configured support
/// portal URL; redirect URIs presented on the authorization endpoint must
/// match it.
#[derive(Clone)]
pub struct Client {
    /// Opaque client identifier.
    pub client_id: String,

    /// Client secret. Never logged; `Debug` redacts it.
    pub client_secret: String,

    /// Host that presented redirect URIs must match.
    pub redirect_domain: String,
}

impl Client {
    /// Returns `true` if the redirect URI's host matches the registered
    /// redirect domain.
    #[must_use]
    pub fn matches_redirect_uri(&self, redirect_uri: &Url) -> bool {
        redirect_uri.host_str() == Some(self.redirect_domain.as_str())
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_domain", &self.redirect_domain)
            .finish()
    }
}
