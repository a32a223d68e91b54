//! Authorization error types.
//!
//! This module defines all error types that can occur while processing
//! authorization, token, and userinfo requests. Every variant is translated
//! into an HTTP/JSON shape at the endpoint boundary; nothing propagates as
//! an unhandled fault.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Errors that can occur during authorization operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request is malformed or missing required parameters.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of why the request is invalid.
        message: String,
    },

    /// The client credentials are invalid or the client is not registered.
    #[error("Invalid client: {message}")]
    InvalidClient {
        /// Description of why the client is invalid.
        message: String,
    },

    /// The authorization code or refresh token is invalid, expired, consumed,
    /// or was issued under different parameters.
    #[error("Invalid grant: {message}")]
    InvalidGrant {
        /// Description of why the grant is invalid.
        message: String,
    },

    /// The requested scope is outside the allowed vocabulary.
    #[error("Invalid scope: {message}")]
    InvalidScope {
        /// Description of why the scope is invalid.
        message: String,
    },

    /// The authorization server does not support the requested grant type.
    #[error("Unsupported grant type: {grant_type}")]
    UnsupportedGrantType {
        /// The unsupported grant type.
        grant_type: String,
    },

    /// The bearer token is missing, malformed, expired, or unknown.
    ///
    /// Deliberately carries no detail: callers must not be able to tell a
    /// malformed token from an expired or unknown one.
    #[error("Invalid bearer token")]
    InvalidToken,

    /// The request reached a route that requires a portal-authenticated user,
    /// but no identity was resolved.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The token resolved to a user whose backing account no longer exists.
    #[error("User account not found")]
    UserNotFound,

    /// The account-service call failed or timed out.
    #[error("Account service unavailable: {message}")]
    Upstream {
        /// Description of the upstream failure.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidClient` error.
    #[must_use]
    pub fn invalid_client(message: impl Into<String>) -> Self {
        Self::InvalidClient {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidGrant` error.
    #[must_use]
    pub fn invalid_grant(message: impl Into<String>) -> Self {
        Self::InvalidGrant {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidScope` error.
    #[must_use]
    pub fn invalid_scope(message: impl Into<String>) -> Self {
        Self::InvalidScope {
            message: message.into(),
        }
    }

    /// Creates a new `UnsupportedGrantType` error.
    #[must_use]
    pub fn unsupported_grant_type(grant_type: impl Into<String>) -> Self {
        Self::UnsupportedGrantType {
            grant_type: grant_type.into(),
        }
    }

    /// Creates a new `Upstream` error.
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. }
                | Self::InvalidClient { .. }
                | Self::InvalidGrant { .. }
                | Self::InvalidScope { .. }
                | Self::UnsupportedGrantType { .. }
                | Self::InvalidToken
                | Self::Unauthenticated
                | Self::UserNotFound
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Internal { .. })
    }

    /// Returns the wire error code for this error.
    ///
    /// OAuth 2.0 codes per RFC 6749 where one exists; domain errors use the
    /// service's own codes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::InvalidClient { .. } => "invalid_client",
            Self::InvalidGrant { .. } => "invalid_grant",
            Self::InvalidScope { .. } => "invalid_scope",
            Self::UnsupportedGrantType { .. } => "unsupported_grant_type",
            Self::InvalidToken => "invalid_token",
            Self::Unauthenticated => "unauthorized",
            Self::UserNotFound => "not_found",
            Self::Upstream { .. } => "upstream_unavailable",
            Self::Internal { .. } => "server_error",
        }
    }

    /// Returns the HTTP status for this error.
    ///
    /// Token-endpoint errors are uniformly 400 (including `invalid_client`);
    /// bearer failures are 400 with a uniform body.
    #[must_use]
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest { .. }
            | Self::InvalidClient { .. }
            | Self::InvalidGrant { .. }
            | Self::InvalidScope { .. }
            | Self::UnsupportedGrantType { .. }
            | Self::InvalidToken => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Bearer failures get a bare code so malformed/expired/unknown are
        // indistinguishable on the wire.
        let body = match &self {
            Self::InvalidToken => json!({ "error": self.error_code() }),
            _ => json!({
                "error": self.error_code(),
                "error_description": self.to_string(),
            }),
        };
        (self.http_status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::invalid_client("client not found");
        assert_eq!(err.to_string(), "Invalid client: client not found");

        let err = AuthError::invalid_grant("expired authorization code");
        assert_eq!(err.to_string(), "Invalid grant: expired authorization code");

        let err = AuthError::InvalidToken;
        assert_eq!(err.to_string(), "Invalid bearer token");
    }

    #[test]
    fn test_error_predicates() {
        assert!(AuthError::invalid_grant("x").is_client_error());
        assert!(!AuthError::invalid_grant("x").is_server_error());
        assert!(AuthError::upstream("down").is_server_error());
        assert!(AuthError::UserNotFound.is_client_error());
    }

    #[test]
    fn test_error_code() {
        assert_eq!(AuthError::invalid_client("x").error_code(), "invalid_client");
        assert_eq!(AuthError::invalid_grant("x").error_code(), "invalid_grant");
        assert_eq!(AuthError::invalid_scope("x").error_code(), "invalid_scope");
        assert_eq!(
            AuthError::unsupported_grant_type("implicit").error_code(),
            "unsupported_grant_type"
        );
        assert_eq!(AuthError::InvalidToken.error_code(), "invalid_token");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(
            AuthError::invalid_client("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::InvalidToken.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AuthError::Unauthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::UserNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::upstream("x").http_status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
