//! Portal identity from the gateway header.

use async_trait::async_trait;
use axum::http::HeaderMap;

use deskgate_auth::{AuthError, UserResolver};

/// Header the portal gateway sets after authenticating the session.
pub const PORTAL_USER_HEADER: &str = "x-portal-user-id";

/// [`UserResolver`] that trusts the portal gateway's identity header.
///
/// The portal fronts this service and authenticates the browser session
/// before proxying; it forwards the numeric account id in
/// [`PORTAL_USER_HEADER`]. This service must not be reachable except
/// through the gateway. A missing or non-numeric header value resolves to
/// anonymous, which the authorization endpoint rejects with 401.
pub struct GatewayIdentity;

#[async_trait]
impl UserResolver for GatewayIdentity {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<u64>, AuthError> {
        Ok(headers
            .get(PORTAL_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok()))
    }
}
