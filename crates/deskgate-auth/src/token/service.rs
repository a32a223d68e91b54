//! Token exchange service.
//!
//! Validates token requests for an already-authenticated client and drives
//! the grant store: code exchange and refresh both end in a fresh opaque
//! access/refresh pair.

use std::sync::Arc;

use crate::AuthResult;
use crate::error::AuthError;
use crate::oauth::token::{TokenRequest, TokenResponse};
use crate::store::GrantStore;
use crate::types::{Client, IssuedTokens};

/// Service behind the token endpoint.
pub struct TokenService {
    store: Arc<dyn GrantStore>,
}

impl TokenService {
    /// Creates a new token service on top of a grant store.
    #[must_use]
    pub fn new(store: Arc<dyn GrantStore>) -> Self {
        Self { store }
    }

    /// Exchanges an authorization code for tokens.
    ///
    /// The code is consumed atomically before any further checks, so a
    /// replayed or concurrent second exchange fails regardless of which
    /// validation would have rejected it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGrant` if the code is missing, unknown, expired,
    /// already consumed, issued to a different client, or if the presented
    /// `redirect_uri` differs from the one used at issuance.
    pub async fn exchange_code(
        &self,
        request: &TokenRequest,
        client: &Client,
    ) -> AuthResult<TokenResponse> {
        let code = request
            .code
            .as_ref()
            .ok_or_else(|| AuthError::invalid_grant("Missing code parameter"))?;
        let redirect_uri = request
            .redirect_uri
            .as_ref()
            .ok_or_else(|| AuthError::invalid_grant("Missing redirect_uri parameter"))?;

        let grant = self.store.consume_code(code).await?;

        if grant.client_id != client.client_id {
            return Err(AuthError::invalid_grant(
                "Authorization code was issued to a different client",
            ));
        }
        if grant.redirect_uri != *redirect_uri {
            return Err(AuthError::invalid_grant(
                "Redirect URI does not match the authorization request",
            ));
        }

        let issued = self
            .store
            .issue_tokens(&client.client_id, grant.user_id, grant.scope)
            .await?;

        tracing::info!(
            client_id = %client.client_id,
            user_id = grant.user_id,
            "Exchanged authorization code for tokens"
        );
        Ok(Self::response(issued))
    }

    /// Exchanges a refresh token for a fresh pair.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGrant` if the refresh token is missing, unknown,
    /// expired, or belongs to a different client.
    pub async fn refresh(
        &self,
        request: &TokenRequest,
        client: &Client,
    ) -> AuthResult<TokenResponse> {
        let refresh_token = request
            .refresh_token
            .as_ref()
            .ok_or_else(|| AuthError::invalid_grant("Missing refresh_token parameter"))?;

        let issued = self.store.refresh(refresh_token, &client.client_id).await?;

        tracing::info!(client_id = %client.client_id, "Refreshed token pair");
        Ok(Self::response(issued))
    }

    fn response(issued: IssuedTokens) -> TokenResponse {
        TokenResponse::new(
            issued.access_token,
            issued.expires_in,
            issued.scope.to_string(),
        )
        .with_refresh_token(issued.refresh_token)
    }
}
