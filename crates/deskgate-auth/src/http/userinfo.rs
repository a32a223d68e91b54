//! OpenID Connect userinfo endpoint handler.

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use tracing::debug;

use super::OAuthState;
use crate::error::AuthError;
use crate::middleware::BearerAuth;

/// Userinfo endpoint.
///
/// Requires `Authorization: Bearer <token>`; resolves the token's grant and
/// returns the identity claims licensed by its scope set. An invalid token
/// yields the uniform 400 bearer error; a token whose backing account no
/// longer exists yields 404; an account-service failure yields 502.
pub async fn userinfo_handler(
    State(state): State<OAuthState>,
    BearerAuth(grant): BearerAuth,
) -> Result<impl IntoResponse, AuthError> {
    debug!(user_id = grant.user_id, "Userinfo requested");
    let claims = state.projector.project(grant.user_id, grant.scope).await?;
    Ok(Json(claims))
}
