//! Bearer token extractor.
//!
//! Resolves the `Authorization: Bearer <token>` header to the grant behind
//! the token. Every failure mode (missing header, wrong scheme, unknown or
//! expired token) rejects with the same uniform error, so callers cannot
//! probe which check failed.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AuthError;
use crate::http::OAuthState;
use crate::types::AccessGrant;

/// Extractor that validates a bearer token and yields its grant.
#[derive(Debug, Clone)]
pub struct BearerAuth(pub AccessGrant);

impl<S> FromRequestParts<S> for BearerAuth
where
    OAuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = OAuthState::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AuthError::InvalidToken)?;

        let grant = state.grants.lookup_access(token).await?;
        Ok(Self(grant))
    }
}
