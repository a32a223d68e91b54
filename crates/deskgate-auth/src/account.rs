//! External account-service boundary.
//!
//! The claims projector resolves user accounts through this trait. The
//! production implementation (an HTTP client in `deskgate-server`) talks to
//! the portal's account service; tests substitute an in-memory map.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::AuthResult;

/// An account record as reported by the account service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    /// First name of the account holder.
    pub first_name: String,

    /// Last name of the account holder.
    pub last_name: String,

    /// Email address on record.
    pub email: String,

    /// Whether the email address has been verified.
    pub verified: bool,
}

/// Account lookup collaborator.
///
/// `Ok(None)` means the account does not exist, which is a distinct outcome
/// from a lookup transport failure (`Err(Upstream)`). Implementations must
/// bound the call with a timeout; a timed-out lookup is an `Upstream` error,
/// never an indefinite hang.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Resolves a user id to its account record, if the account exists.
    ///
    /// # Errors
    ///
    /// Returns `Upstream` if the account service cannot be reached, fails,
    /// or times out.
    async fn find_account(&self, user_id: u64) -> AuthResult<Option<AccountRecord>>;
}
