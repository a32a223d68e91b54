//! Grant store: outstanding authorization codes and issued tokens.
//!
//! The grant store is the only shared mutable state in the service. It
//! holds no durable data by design: a restart drops every outstanding code
//! and token, and clients recover through a fresh authorization flow.
//!
//! # Implementation Notes
//!
//! Implementations must:
//!
//! - Consume codes atomically (a code exchanged twice fails the second
//!   time, even under concurrent exchange attempts)
//! - Report expired codes/tokens with the exact same error shape as
//!   unknown ones
//! - Discard expired entries lazily at lookup time; no background sweep
//!   is required

use async_trait::async_trait;
use time::Duration;

use crate::AuthResult;
use crate::config::OAuthConfig;
use crate::scope::ScopeSet;
use crate::types::{AccessGrant, AuthorizationCode, IssuedTokens};

pub mod memory;

pub use memory::MemoryGrantStore;

/// Lifetimes applied to newly issued codes and tokens.
#[derive(Debug, Clone, Copy)]
pub struct GrantLifetimes {
    /// Authorization code lifetime.
    pub code: Duration,

    /// Access token lifetime.
    pub access: Duration,

    /// Refresh token lifetime.
    pub refresh: Duration,
}

impl From<&OAuthConfig> for GrantLifetimes {
    fn from(config: &OAuthConfig) -> Self {
        Self {
            code: Duration::seconds(config.authorization_code_lifetime.as_secs() as i64),
            access: Duration::seconds(config.access_token_lifetime.as_secs() as i64),
            refresh: Duration::seconds(config.refresh_token_lifetime.as_secs() as i64),
        }
    }
}

/// Storage and issuance of authorization codes and bearer tokens.
///
/// All read-modify-write sequences serialize inside the store, so callers
/// can race freely.
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Issues a new authorization code for the given grant parameters and
    /// returns the plaintext code string.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store is unusable.
    async fn issue_code(
        &self,
        client_id: &str,
        user_id: u64,
        scope: ScopeSet,
        redirect_uri: &str,
    ) -> AuthResult<String>;

    /// Atomically removes and returns the grant behind an authorization
    /// code.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGrant` for unknown, expired, and already-consumed
    /// codes, all with the same error shape.
    async fn consume_code(&self, code: &str) -> AuthResult<AuthorizationCode>;

    /// Issues a fresh access/refresh token pair for the given grant
    /// parameters.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store is unusable.
    async fn issue_tokens(
        &self,
        client_id: &str,
        user_id: u64,
        scope: ScopeSet,
    ) -> AuthResult<IssuedTokens>;

    /// Resolves a presented access token to its grant.
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` for unknown and expired tokens alike.
    async fn lookup_access(&self, access_token: &str) -> AuthResult<AccessGrant>;

    /// Exchanges a refresh token for a fresh token pair, preserving the
    /// original client, user, and scope. The old pair is discarded
    /// (refresh rotation).
    ///
    /// # Errors
    ///
    /// Returns `InvalidGrant` for unknown and expired refresh tokens, and
    /// for tokens that were issued to a different client than `client_id`,
    /// all with the same error shape.
    async fn refresh(&self, refresh_token: &str, client_id: &str) -> AuthResult<IssuedTokens>;
}
