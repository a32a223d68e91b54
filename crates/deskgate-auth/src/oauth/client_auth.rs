//! Client authentication for the token endpoint.
//!
//! The support portal is a confidential client and must authenticate on
//! every token request, either with HTTP Basic Auth or with `client_id` +
//! `client_secret` in the form body. When both are present, the Basic Auth
//! header wins.

use axum::http::HeaderMap;

use crate::AuthResult;
use crate::error::AuthError;
use crate::oauth::token::TokenRequest;
use crate::registry::ClientRegistry;
use crate::types::Client;

/// Client credentials extracted from a token request.
#[derive(Debug, Clone)]
pub enum ClientAuth {
    /// HTTP Basic authentication.
    Basic {
        /// Client id from the Authorization header.
        client_id: String,
        /// Client secret from the Authorization header.
        client_secret: String,
    },

    /// Credentials in the form body.
    Body {
        /// Client id from the body.
        client_id: String,
        /// Client secret from the body.
        client_secret: String,
    },

    /// No usable credentials present.
    None,
}

/// Extracts client credentials from the Authorization header or body.
#[must_use]
pub fn extract_client_auth(headers: &HeaderMap, request: &TokenRequest) -> ClientAuth {
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if let Some((client_id, client_secret)) = parse_basic_auth(value) {
            return ClientAuth::Basic {
                client_id,
                client_secret,
            };
        }
    }

    if let (Some(client_id), Some(client_secret)) =
        (request.client_id.as_ref(), request.client_secret.as_ref())
    {
        return ClientAuth::Body {
            client_id: client_id.clone(),
            client_secret: client_secret.clone(),
        };
    }

    ClientAuth::None
}

/// Authenticates a client against the registry.
///
/// # Errors
///
/// Returns `InvalidClient` if no credentials were provided, the client is
/// unknown, or the secret does not match. The three cases share one
/// message so callers learn nothing about which check failed.
pub fn authenticate_client(registry: &ClientRegistry, auth: ClientAuth) -> AuthResult<Client> {
    let (client_id, client_secret) = match auth {
        ClientAuth::Basic {
            client_id,
            client_secret,
        }
        | ClientAuth::Body {
            client_id,
            client_secret,
        } => (client_id, client_secret),
        ClientAuth::None => {
            return Err(AuthError::invalid_client("Client authentication failed"));
        }
    };

    if !registry.verify_secret(&client_id, &client_secret) {
        return Err(AuthError::invalid_client("Client authentication failed"));
    }

    registry
        .lookup(&client_id)
        .cloned()
        .ok_or_else(|| AuthError::invalid_client("Client authentication failed"))
}

/// Parses an HTTP Basic Auth header value into `(client_id, client_secret)`.
///
/// Returns `None` for any other scheme or a malformed value. The secret may
/// contain colons; the split happens on the first one.
#[must_use]
pub fn parse_basic_auth(header_value: &str) -> Option<(String, String)> {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    let encoded = header_value.trim().strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (client_id, client_secret) = credentials.split_once(':')?;
    Some((client_id.to_string(), client_secret.to_string()))
}
