//! Authorization endpoint types and validation.
//!
//! The authorization endpoint is the entry point of the code flow:
//!
//! 1. The support portal redirects the (already logged-in) user here
//! 2. The request is validated against the registered client
//! 3. The server redirects back with an authorization code
//!
//! Success and failure are both communicated by redirect; the `state`
//! parameter is echoed verbatim in either case, never dropped.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::registry::ClientRegistry;
use crate::scope::{ScopeSet, ScopeValidator};

/// Authorization request query parameters.
///
/// Everything is optional at the parsing layer so validation can produce
/// proper OAuth error redirects instead of framework rejections.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationRequest {
    /// Must be "code"; this server only speaks the authorization code flow.
    #[serde(default)]
    pub response_type: Option<String>,

    /// Client identifier.
    #[serde(default)]
    pub client_id: Option<String>,

    /// Redirect URI; its host must match the registered redirect domain.
    #[serde(default)]
    pub redirect_uri: Option<String>,

    /// Requested scopes (space-separated). Absent means empty.
    #[serde(default)]
    pub scope: Option<String>,

    /// CSRF protection parameter, echoed verbatim on every redirect.
    #[serde(default)]
    pub state: Option<String>,
}

/// Successful authorization redirect parameters.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationResponse {
    /// The one-time authorization code.
    pub code: String,

    /// Echoed state parameter, when the request carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl AuthorizationResponse {
    /// Creates a new authorization response.
    #[must_use]
    pub fn new(code: String, state: Option<String>) -> Self {
        Self { code, state }
    }

    /// Builds the redirect URL carrying `code` and `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect URI does not parse.
    pub fn to_redirect_url(&self, redirect_uri: &str) -> Result<String, url::ParseError> {
        let mut url = Url::parse(redirect_uri)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("code", &self.code);
            if let Some(ref state) = self.state {
                pairs.append_pair("state", state);
            }
        }
        Ok(url.to_string())
    }
}

/// Authorization error redirect parameters.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationError {
    /// OAuth 2.0 error code.
    pub error: AuthorizationErrorCode,

    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    /// Echoed state parameter, when the request carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl AuthorizationError {
    /// Creates a new authorization error with description.
    #[must_use]
    pub fn with_description(
        error: AuthorizationErrorCode,
        description: impl Into<String>,
        state: Option<String>,
    ) -> Self {
        Self {
            error,
            error_description: Some(description.into()),
            state,
        }
    }

    /// Builds the redirect URL carrying the error parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect URI does not parse.
    pub fn to_redirect_url(&self, redirect_uri: &str) -> Result<String, url::ParseError> {
        let mut url = Url::parse(redirect_uri)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("error", self.error.as_str());
            if let Some(ref desc) = self.error_description {
                pairs.append_pair("error_description", desc);
            }
            if let Some(ref state) = self.state {
                pairs.append_pair("state", state);
            }
        }
        Ok(url.to_string())
    }
}

/// OAuth 2.0 authorization error codes emitted by this endpoint.
///
/// Defined in RFC 6749 Section 4.1.2.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationErrorCode {
    /// The request is missing a required parameter or is otherwise
    /// malformed (including a redirect URI on a foreign host and a
    /// response type other than "code").
    InvalidRequest,

    /// The client is unknown or not authorized to request a code.
    UnauthorizedClient,

    /// The requested scope is outside the allowed vocabulary.
    InvalidScope,
}

impl AuthorizationErrorCode {
    /// Returns the string representation of the error code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::InvalidScope => "invalid_scope",
        }
    }
}

impl fmt::Display for AuthorizationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validates an authorization request against the client registry and the
/// injected scope policy.
///
/// Validation order: client exists, redirect host matches the registered
/// domain, the scope policy grants the requested set, response type is
/// "code". Returns the granted scope set on success.
///
/// # Errors
///
/// Returns the redirect-ready [`AuthorizationError`] for the first
/// violation, with the request's `state` already attached.
pub fn validate_authorization(
    registry: &ClientRegistry,
    scopes: &dyn ScopeValidator,
    request: &AuthorizationRequest,
    redirect_uri: &Url,
) -> Result<ScopeSet, AuthorizationError> {
    let state = request.state.clone();

    let client = request
        .client_id
        .as_deref()
        .and_then(|id| registry.lookup(id))
        .ok_or_else(|| {
            AuthorizationError::with_description(
                AuthorizationErrorCode::UnauthorizedClient,
                "Unknown client",
                state.clone(),
            )
        })?;

    if !client.matches_redirect_uri(redirect_uri) {
        return Err(AuthorizationError::with_description(
            AuthorizationErrorCode::InvalidRequest,
            "Redirect URI host is not registered for this client",
            state,
        ));
    }

    let scope = scopes
        .validate(request.scope.as_deref().unwrap_or_default())
        .map_err(|e| {
            AuthorizationError::with_description(
                AuthorizationErrorCode::InvalidScope,
                e.to_string(),
                state.clone(),
            )
        })?;

    if request.response_type.as_deref() != Some("code") {
        return Err(AuthorizationError::with_description(
            AuthorizationErrorCode::InvalidRequest,
            "response_type must be \"code\"",
            state,
        ));
    }

    Ok(scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OAuthConfig, SupportConfig};
    use crate::scope::FixedScopeValidator;

    fn registry() -> ClientRegistry {
        ClientRegistry::from_config(&SupportConfig {
            client_id: "portal-client".to_string(),
            client_secret: "secret123".to_string(),
            support_portal_url: "https://support.example.com".to_string(),
            mailbox_id: "12".to_string(),
            oauth: OAuthConfig::default(),
        })
        .unwrap()
    }

    fn request() -> AuthorizationRequest {
        AuthorizationRequest {
            response_type: Some("code".to_string()),
            client_id: Some("portal-client".to_string()),
            redirect_uri: Some("https://support.example.com/oauth/callback".to_string()),
            scope: Some("openid email".to_string()),
            state: Some("xyz".to_string()),
        }
    }

    fn redirect(request: &AuthorizationRequest) -> Url {
        Url::parse(request.redirect_uri.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn test_valid_request() {
        let req = request();
        let scope = validate_authorization(&registry(), &FixedScopeValidator, &req, &redirect(&req)).unwrap();
        assert_eq!(scope.to_string(), "openid email");
    }

    #[test]
    fn test_unknown_client() {
        let mut req = request();
        req.client_id = Some("someone-else".to_string());
        let err = validate_authorization(&registry(), &FixedScopeValidator, &req, &redirect(&req)).unwrap_err();
        assert_eq!(err.error, AuthorizationErrorCode::UnauthorizedClient);
        assert_eq!(err.state.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_foreign_redirect_host() {
        let mut req = request();
        req.redirect_uri = Some("https://evil.example.net/cb".to_string());
        let err = validate_authorization(&registry(), &FixedScopeValidator, &req, &redirect(&req)).unwrap_err();
        assert_eq!(err.error, AuthorizationErrorCode::InvalidRequest);
    }

    #[test]
    fn test_invalid_scope_echoes_state() {
        let mut req = request();
        req.scope = Some("openid admin".to_string());
        let err = validate_authorization(&registry(), &FixedScopeValidator, &req, &redirect(&req)).unwrap_err();
        assert_eq!(err.error, AuthorizationErrorCode::InvalidScope);
        assert_eq!(err.state.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_wrong_response_type() {
        let mut req = request();
        req.response_type = Some("token".to_string());
        let err = validate_authorization(&registry(), &FixedScopeValidator, &req, &redirect(&req)).unwrap_err();
        assert_eq!(err.error, AuthorizationErrorCode::InvalidRequest);
    }

    #[test]
    fn test_response_redirect_url() {
        let response =
            AuthorizationResponse::new("code123".to_string(), Some("state456".to_string()));
        let url = response
            .to_redirect_url("https://support.example.com/cb")
            .unwrap();
        assert!(url.starts_with("https://support.example.com/cb?"));
        assert!(url.contains("code=code123"));
        assert!(url.contains("state=state456"));
    }

    #[test]
    fn test_error_redirect_url() {
        let error = AuthorizationError::with_description(
            AuthorizationErrorCode::InvalidScope,
            "Unknown scope",
            Some("state123".to_string()),
        );
        let url = error
            .to_redirect_url("https://support.example.com/cb")
            .unwrap();
        assert!(url.contains("error=invalid_scope"));
        assert!(url.contains("error_description=Unknown+scope"));
        assert!(url.contains("state=state123"));
    }

    #[test]
    fn test_redirect_without_state() {
        let response = AuthorizationResponse::new("code123".to_string(), None);
        let url = response
            .to_redirect_url("https://support.example.com/cb")
            .unwrap();
        assert!(!url.contains("state="));
    }
}
