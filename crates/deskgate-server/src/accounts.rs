//! HTTP account-service client.
//!
//! Resolves user accounts against the portal's internal account API:
//! `GET {base_url}/api/internal/accounts/{id}` returns the account record
//! as JSON, or 404 when no such account exists.

use async_trait::async_trait;
use reqwest::StatusCode;

use deskgate_auth::{AccountRecord, AccountService, AuthError};

use crate::config::AccountServiceConfig;

/// [`AccountService`] implementation over the portal's account API.
///
/// Every request carries the configured timeout; a timed-out or failed
/// call surfaces as `Upstream`, distinctly from an absent account.
pub struct HttpAccountService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAccountService {
    /// Builds the client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &AccountServiceConfig) -> Result<Self, deskgate_auth::ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| deskgate_auth::ConfigError::Load {
                message: format!("failed to build account service client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AccountService for HttpAccountService {
    async fn find_account(&self, user_id: u64) -> Result<Option<AccountRecord>, AuthError> {
        let url = format!("{}/api/internal/accounts/{user_id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AuthError::upstream(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<AccountRecord>()
                .await
                .map(Some)
                .map_err(|e| AuthError::upstream(format!("malformed account record: {e}"))),
            status => Err(AuthError::upstream(format!(
                "account service returned {status}"
            ))),
        }
    }
}
