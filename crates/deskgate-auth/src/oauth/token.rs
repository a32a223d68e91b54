//! Token endpoint types.
//!
//! Request parsing, response generation, and error shapes for the token
//! endpoint.
//!
//! # Supported Grant Types
//!
//! - `authorization_code` - Exchange an authorization code for tokens
//! - `refresh_token` - Exchange a refresh token for a fresh pair

use std::fmt;

use serde::{Deserialize, Serialize};

/// Token request parameters (form-encoded body).
///
/// Different fields are required depending on the `grant_type`:
///
/// - `authorization_code`: `code`, `redirect_uri`
/// - `refresh_token`: `refresh_token`
///
/// Client credentials arrive either in the body (`client_id` +
/// `client_secret`) or via HTTP Basic Auth (not part of this struct).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    /// OAuth 2.0 grant type.
    pub grant_type: String,

    /// Authorization code (for `authorization_code`).
    #[serde(default)]
    pub code: Option<String>,

    /// Redirect URI; must equal the one used at code issuance.
    #[serde(default)]
    pub redirect_uri: Option<String>,

    /// Client id (for body credentials).
    #[serde(default)]
    pub client_id: Option<String>,

    /// Client secret (for body credentials).
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Refresh token (for `refresh_token`).
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Successful token response.
///
/// # Example Response
///
/// ```json
/// {
///   "access_token": "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk",
///   "token_type": "bearer",
///   "expires_in": 7200,
///   "refresh_token": "tGzv3JOkF0XG5Qx2TlKWIA",
///   "scope": "openid email"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The opaque access token.
    pub access_token: String,

    /// Token type, always "bearer".
    pub token_type: String,

    /// Access token lifetime in seconds.
    pub expires_in: u64,

    /// Refresh token for obtaining a fresh pair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Granted scopes (space-separated).
    pub scope: String,
}

impl TokenResponse {
    /// Creates a new token response with required fields.
    #[must_use]
    pub fn new(access_token: String, expires_in: u64, scope: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
            refresh_token: None,
            scope,
        }
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, token: String) -> Self {
        self.refresh_token = Some(token);
        self
    }
}

/// Token error response body.
///
/// # Example Response
///
/// ```json
/// {
///   "error": "invalid_grant",
///   "error_description": "Authorization code is invalid or expired"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct TokenError {
    /// OAuth 2.0 error code.
    pub error: TokenErrorCode,

    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl TokenError {
    /// Creates a new token error with description.
    #[must_use]
    pub fn with_description(error: TokenErrorCode, description: impl Into<String>) -> Self {
        Self {
            error,
            error_description: Some(description.into()),
        }
    }
}

/// OAuth 2.0 token error codes.
///
/// Defined in RFC 6749 Section 5.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenErrorCode {
    /// The request is missing a required parameter or is otherwise
    /// malformed.
    InvalidRequest,

    /// Client authentication failed.
    InvalidClient,

    /// The authorization code or refresh token is invalid, expired,
    /// consumed, or was issued under different parameters.
    InvalidGrant,

    /// The grant type is not supported by this server.
    UnsupportedGrantType,

    /// The requested scope is invalid, unknown, or malformed.
    InvalidScope,
}

impl TokenErrorCode {
    /// Returns the string representation of the error code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidClient => "invalid_client",
            Self::InvalidGrant => "invalid_grant",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::InvalidScope => "invalid_scope",
        }
    }
}

impl fmt::Display for TokenErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
