//! Identity claims projection.
//!
//! Maps a granted scope set to a filtered identity-claims document for the
//! `/userinfo` endpoint. Claims are computed per request from the account
//! service, never persisted. Fields not licensed by scope are entirely
//! absent from the serialized output, not present-but-empty.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::AuthResult;
use crate::account::AccountService;
use crate::error::AuthError;
use crate::scope::ScopeSet;

/// Identity claims per OpenID Connect Core 1.0.
///
/// Which fields are populated depends on the scopes granted to the access
/// token:
///
/// - `sub` is always present
/// - `profile` grants `name`, `given_name`, `family_name`
/// - `email` grants `email`, `email_verified`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserInfoResponse {
    /// Subject identifier: the user's numeric account id, as a string.
    pub sub: String,

    /// Full name ("{given} {family}").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Given name(s) or first name(s).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    /// Surname(s) or last name(s).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    /// Shorthand name the user wishes to be referred to by.
    /// Part of the wire shape; the account service does not currently
    /// supply one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,

    /// Preferred email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// True if the email address has been verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,

    /// URL of a profile picture.
    /// Part of the wire shape; the account service does not currently
    /// supply one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Projects account records into scope-gated claims documents.
pub struct ClaimsProjector {
    accounts: Arc<dyn AccountService>,
}

impl ClaimsProjector {
    /// Creates a projector over an account-service collaborator.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountService>) -> Self {
        Self { accounts }
    }

    /// Builds the claims document for a user, filtered by scope.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the backing account no longer exists, or
    /// `Upstream` if the account service failed or timed out.
    pub async fn project(&self, user_id: u64, scope: ScopeSet) -> AuthResult<UserInfoResponse> {
        let account = self
            .accounts
            .find_account(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let mut claims = UserInfoResponse {
            sub: user_id.to_string(),
            ..Default::default()
        };

        if scope.profile {
            claims.name = Some(format!("{} {}", account.first_name, account.last_name));
            claims.given_name = Some(account.first_name);
            claims.family_name = Some(account.last_name);
        }

        if scope.email {
            claims.email = Some(account.email);
            claims.email_verified = Some(account.verified);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountRecord;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MockAccountService {
        accounts: HashMap<u64, AccountRecord>,
        fail: bool,
    }

    impl MockAccountService {
        fn with_account(user_id: u64) -> Self {
            let mut accounts = HashMap::new();
            accounts.insert(
                user_id,
                AccountRecord {
                    first_name: "Ada".to_string(),
                    last_name: "Lovelace".to_string(),
                    email: "a@b.com".to_string(),
                    verified: true,
                },
            );
            Self {
                accounts,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                accounts: HashMap::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl AccountService for MockAccountService {
        async fn find_account(&self, user_id: u64) -> AuthResult<Option<AccountRecord>> {
            if self.fail {
                return Err(AuthError::upstream("connection refused"));
            }
            Ok(self.accounts.get(&user_id).cloned())
        }
    }

    fn projector(service: MockAccountService) -> ClaimsProjector {
        ClaimsProjector::new(Arc::new(service))
    }

    #[tokio::test]
    async fn test_openid_only_yields_sub_only() {
        let projector = projector(MockAccountService::with_account(42));
        let claims = projector
            .project(42, ScopeSet::parse("openid").unwrap())
            .await
            .unwrap();

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "42");
        assert_eq!(
            json.as_object().unwrap().keys().collect::<Vec<_>>(),
            vec!["sub"]
        );
    }

    #[tokio::test]
    async fn test_profile_scope_grants_name_claims() {
        let projector = projector(MockAccountService::with_account(42));
        let claims = projector
            .project(42, ScopeSet::parse("openid profile").unwrap())
            .await
            .unwrap();

        assert_eq!(claims.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(claims.given_name.as_deref(), Some("Ada"));
        assert_eq!(claims.family_name.as_deref(), Some("Lovelace"));
        assert!(claims.email.is_none());
    }

    #[tokio::test]
    async fn test_email_scope_grants_email_claims() {
        let projector = projector(MockAccountService::with_account(42));
        let claims = projector
            .project(42, ScopeSet::parse("openid email").unwrap())
            .await
            .unwrap();

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "42");
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["email_verified"], true);
        // Profile claims must be absent, not empty.
        assert!(json.get("name").is_none());
        assert!(json.get("given_name").is_none());
        assert!(json.get("family_name").is_none());
    }

    #[tokio::test]
    async fn test_missing_account_is_user_not_found() {
        let projector = projector(MockAccountService::with_account(42));
        let result = projector.project(7, ScopeSet::parse("openid").unwrap()).await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_upstream() {
        let projector = projector(MockAccountService::failing());
        let result = projector.project(42, ScopeSet::parse("openid").unwrap()).await;
        assert!(matches!(result, Err(AuthError::Upstream { .. })));
    }
}
