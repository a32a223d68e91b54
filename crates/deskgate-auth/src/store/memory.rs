//! In-memory grant store.
//!
//! Codes and tokens live in process memory behind a single mutex; a restart
//! loses all of them by design. Codes are stored under their plaintext
//! value (one-time, minutes-lived); token records are keyed by SHA-256
//! digest so plaintext token values never rest in the store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{GrantLifetimes, GrantStore};
use crate::AuthResult;
use crate::error::AuthError;
use crate::scope::ScopeSet;
use crate::types::{AccessGrant, AuthorizationCode, IssuedTokens, TokenGrant};

/// One error shape for every way a code exchange can miss, so a replayed
/// code is indistinguishable from an expired or unknown one.
const CODE_INVALID: &str = "Authorization code is invalid or expired";

/// Likewise for refresh tokens.
const REFRESH_INVALID: &str = "Refresh token is invalid or expired";

#[derive(Default)]
struct Maps {
    /// Outstanding authorization codes, keyed by code value.
    codes: HashMap<String, AuthorizationCode>,

    /// Issued token grants, keyed by access-token digest.
    grants: HashMap<String, TokenGrant>,

    /// Refresh-token digest -> access-token digest of the owning grant.
    refresh_index: HashMap<String, String>,
}

/// In-memory [`GrantStore`] implementation.
pub struct MemoryGrantStore {
    inner: Mutex<Maps>,
    lifetimes: GrantLifetimes,
}

impl MemoryGrantStore {
    /// Creates an empty store issuing grants with the given lifetimes.
    #[must_use]
    pub fn new(lifetimes: GrantLifetimes) -> Self {
        Self {
            inner: Mutex::new(Maps::default()),
            lifetimes,
        }
    }

    fn lock(&self) -> AuthResult<MutexGuard<'_, Maps>> {
        self.inner
            .lock()
            .map_err(|_| AuthError::internal("Grant store lock poisoned"))
    }

    /// Builds and records a token grant, returning the plaintext pair.
    /// Caller must hold the store lock.
    fn record_tokens(
        maps: &mut Maps,
        lifetimes: GrantLifetimes,
        client_id: &str,
        user_id: u64,
        scope: ScopeSet,
    ) -> IssuedTokens {
        let now = OffsetDateTime::now_utc();
        let access_token = TokenGrant::generate_token();
        let refresh_token = TokenGrant::generate_token();
        let access_token_hash = TokenGrant::hash_token(&access_token);
        let refresh_token_hash = TokenGrant::hash_token(&refresh_token);

        let grant = TokenGrant {
            id: Uuid::new_v4(),
            access_token_hash: access_token_hash.clone(),
            refresh_token_hash: refresh_token_hash.clone(),
            client_id: client_id.to_string(),
            user_id,
            scope,
            created_at: now,
            access_expires_at: now + lifetimes.access,
            refresh_expires_at: now + lifetimes.refresh,
        };

        maps.refresh_index
            .insert(refresh_token_hash, access_token_hash.clone());
        maps.grants.insert(access_token_hash, grant);

        IssuedTokens {
            access_token,
            refresh_token,
            expires_in: lifetimes.access.whole_seconds().max(0) as u64,
            scope,
        }
    }

    /// Drops a grant and its refresh index entry. Caller must hold the lock.
    fn evict_grant(maps: &mut Maps, access_token_hash: &str) {
        if let Some(grant) = maps.grants.remove(access_token_hash) {
            maps.refresh_index.remove(&grant.refresh_token_hash);
        }
    }
}

#[async_trait]
impl GrantStore for MemoryGrantStore {
    async fn issue_code(
        &self,
        client_id: &str,
        user_id: u64,
        scope: ScopeSet,
        redirect_uri: &str,
    ) -> AuthResult<String> {
        let now = OffsetDateTime::now_utc();
        let code = AuthorizationCode::generate_code();
        let record = AuthorizationCode {
            code: code.clone(),
            client_id: client_id.to_string(),
            user_id,
            scope,
            redirect_uri: redirect_uri.to_string(),
            created_at: now,
            expires_at: now + self.lifetimes.code,
        };

        self.lock()?.codes.insert(code.clone(), record);
        tracing::debug!(client_id, user_id, "Issued authorization code");
        Ok(code)
    }

    async fn consume_code(&self, code: &str) -> AuthResult<AuthorizationCode> {
        // Removal happens before any further checks, inside one lock hold:
        // a concurrent second exchange observes absence.
        let record = self
            .lock()?
            .codes
            .remove(code)
            .ok_or_else(|| AuthError::invalid_grant(CODE_INVALID))?;

        if record.is_expired() {
            return Err(AuthError::invalid_grant(CODE_INVALID));
        }
        Ok(record)
    }

    async fn issue_tokens(
        &self,
        client_id: &str,
        user_id: u64,
        scope: ScopeSet,
    ) -> AuthResult<IssuedTokens> {
        let mut maps = self.lock()?;
        let issued = Self::record_tokens(&mut maps, self.lifetimes, client_id, user_id, scope);
        drop(maps);

        tracing::debug!(client_id, user_id, "Issued token pair");
        Ok(issued)
    }

    async fn lookup_access(&self, access_token: &str) -> AuthResult<AccessGrant> {
        let hash = TokenGrant::hash_token(access_token);
        let mut maps = self.lock()?;

        let (access_expired, refresh_expired, grant) = match maps.grants.get(&hash) {
            None => return Err(AuthError::InvalidToken),
            Some(grant) => (
                grant.is_access_expired(),
                grant.is_refresh_expired(),
                AccessGrant {
                    client_id: grant.client_id.clone(),
                    user_id: grant.user_id,
                    scope: grant.scope,
                },
            ),
        };

        if access_expired {
            // Lazy reap, but only once the refresh side is dead too: an
            // expired access token must not take a live refresh token
            // down with it.
            if refresh_expired {
                Self::evict_grant(&mut maps, &hash);
            }
            return Err(AuthError::InvalidToken);
        }
        Ok(grant)
    }

    async fn refresh(&self, refresh_token: &str, client_id: &str) -> AuthResult<IssuedTokens> {
        let hash = TokenGrant::hash_token(refresh_token);
        let mut maps = self.lock()?;

        let Some(access_hash) = maps.refresh_index.get(&hash).cloned() else {
            return Err(AuthError::invalid_grant(REFRESH_INVALID));
        };
        let (refresh_expired, grant_client_id, user_id, scope) =
            match maps.grants.get(&access_hash) {
                None => return Err(AuthError::invalid_grant(REFRESH_INVALID)),
                Some(grant) => (
                    grant.is_refresh_expired(),
                    grant.client_id.clone(),
                    grant.user_id,
                    grant.scope,
                ),
            };

        if refresh_expired {
            Self::evict_grant(&mut maps, &access_hash);
            return Err(AuthError::invalid_grant(REFRESH_INVALID));
        }
        if grant_client_id != client_id {
            return Err(AuthError::invalid_grant(REFRESH_INVALID));
        }
        // Rotate: the old pair dies with the reissue, inside the same lock
        // hold, so a replayed refresh token fails like a replayed code.
        Self::evict_grant(&mut maps, &access_hash);
        let issued = Self::record_tokens(&mut maps, self.lifetimes, client_id, user_id, scope);
        drop(maps);

        tracing::debug!(client_id, user_id, "Refreshed token pair");
        Ok(issued)
    }
}
