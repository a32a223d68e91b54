//! Issued token records.
//!
//! # Security Considerations
//!
//! - Only SHA-256 digests of token strings are stored; lookups hash the
//!   presented token first
//! - Access and refresh tokens carry independent expiries
//! - Token values are never logged

use time::OffsetDateTime;
use uuid::Uuid;

use crate::scope::ScopeSet;

/// A stored access/refresh token pair and the grant behind it.
///
/// Created by the token endpoint on a successful code or refresh exchange,
/// read by the bearer validator on every protected request. There is no
/// explicit revocation path; entries are discarded lazily once expired.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    /// Unique record identifier.
    pub id: Uuid,

    /// SHA-256 hex digest of the access token.
    pub access_token_hash: String,

    /// SHA-256 hex digest of the refresh token.
    pub refresh_token_hash: String,

    /// Client the tokens were issued to.
    pub client_id: String,

    /// Resource owner the tokens were issued for.
    pub user_id: u64,

    /// Scopes carried by the grant.
    pub scope: ScopeSet,

    /// Timestamp when the pair was issued.
    pub created_at: OffsetDateTime,

    /// Timestamp after which the access token stops validating.
    pub access_expires_at: OffsetDateTime,

    /// Timestamp after which the refresh token stops exchanging.
    pub refresh_expires_at: OffsetDateTime,
}

impl TokenGrant {
    /// Returns `true` if the access token is past its expiry.
    #[must_use]
    pub fn is_access_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.access_expires_at
    }

    /// Returns `true` if the refresh token is past its expiry.
    #[must_use]
    pub fn is_refresh_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.refresh_expires_at
    }

    /// Hash a token value using SHA-256.
    ///
    /// Used both when storing new tokens and when looking up presented
    /// ones, so plaintext token values never rest in the store.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Generate a cryptographically secure random token.
    ///
    /// 32 bytes of random data, base64url without padding.
    #[must_use]
    pub fn generate_token() -> String {
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

/// Plaintext token pair handed back to the client on a successful exchange.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    /// The access token value.
    pub access_token: String,

    /// The refresh token value.
    pub refresh_token: String,

    /// Access token lifetime in seconds.
    pub expires_in: u64,

    /// Scopes carried by the grant.
    pub scope: ScopeSet,
}

/// The grant a validated bearer token resolves to.
#[derive(Debug, Clone)]
pub struct AccessGrant {
    /// Client the token was issued to.
    pub client_id: String,

    /// Resource owner the token was issued for.
    pub user_id: u64,

    /// Scopes carried by the grant.
    pub scope: ScopeSet,
}
