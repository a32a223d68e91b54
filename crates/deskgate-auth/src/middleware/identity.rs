//! Portal identity resolution.
//!
//! The authorization endpoint never authenticates credentials itself: the
//! surrounding portal has already logged the user in, and a [`UserResolver`]
//! strategy injected at construction recovers that identity from the
//! request. Production uses the gateway identity header; tests substitute a
//! fixed user.

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

use crate::AuthResult;
use crate::error::AuthError;
use crate::http::OAuthState;

/// Strategy for resolving the authenticated portal user of a request.
#[async_trait]
pub trait UserResolver: Send + Sync {
    /// Returns the authenticated user id, or `None` for anonymous requests.
    ///
    /// # Errors
    ///
    /// Returns an error only for resolver-internal failures; an absent or
    /// unparseable identity is `Ok(None)`.
    async fn resolve(&self, headers: &HeaderMap) -> AuthResult<Option<u64>>;
}

/// Extractor for the authenticated portal user.
///
/// Rejects with 401 before any OAuth processing when the request carries
/// no resolvable identity.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub u64);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    OAuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = OAuthState::from_ref(state);
        match state.users.resolve(&parts.headers).await? {
            Some(user_id) => Ok(Self(user_id)),
            None => Err(AuthError::Unauthenticated),
        }
    }
}
