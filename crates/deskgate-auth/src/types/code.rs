//! Authorization code records.
//!
//! # Security Considerations
//!
//! - Codes are single-use: the store removes them on consumption
//! - Codes are short-lived (minutes) and never logged
//! - Expired codes are indistinguishable from unknown ones to callers

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use time::OffsetDateTime;

use crate::scope::ScopeSet;

/// An outstanding authorization code and the grant parameters behind it.
///
/// Created by the authorization endpoint, consumed exactly once by the
/// token endpoint. The redirect URI used at issuance is recorded so the
/// exchange can verify the client presents the same one.
#[derive(Debug, Clone)]
pub struct AuthorizationCode {
    /// The one-time code string. 256-bit random value, base64url-encoded.
    pub code: String,

    /// Client the code was issued to.
    pub client_id: String,

    /// Resource owner the code was issued for.
    pub user_id: u64,

    /// Scopes granted by this authorization.
    pub scope: ScopeSet,

    /// Redirect URI presented on the authorization request.
    pub redirect_uri: String,

    /// Timestamp when the code was issued.
    pub created_at: OffsetDateTime,

    /// Timestamp after which the code is no longer exchangeable.
    pub expires_at: OffsetDateTime,
}

impl AuthorizationCode {
    /// Generates a new cryptographically secure authorization code.
    ///
    /// 32 bytes of random data, base64url without padding (43 characters),
    /// well above the 128 bits of entropy RFC 6749 recommends.
    #[must_use]
    pub fn generate_code() -> String {
        use base64::Engine;

        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Returns `true` if the code is past its expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }
}
