//! # deskgate-auth
//!
//! Authorization core for the Deskgate support-portal SSO service.
//!
//! This crate implements a minimal OAuth 2.0 / OpenID Connect authorization
//! server for a single pre-registered client (the external support portal):
//!
//! - Authorization code flow for an already-authenticated portal user
//! - Code/refresh exchange for opaque bearer access tokens
//! - Bearer validation for resource requests
//! - Scope-gated identity claims (`/userinfo`)
//!
//! ## Modules
//!
//! - [`config`] - Support OAuth configuration and startup validation
//! - [`registry`] - The single-client registry
//! - [`store`] - Grant store (authorization codes and issued tokens)
//! - [`oauth`] - Authorization/token endpoint types and client authentication
//! - [`token`] - Token exchange service
//! - [`claims`] - Identity claims projection
//! - [`account`] - External account-service boundary
//! - [`middleware`] - Bearer and portal-identity extractors
//! - [`http`] - Axum HTTP handlers for the three OAuth routes

pub mod account;
pub mod claims;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod oauth;
pub mod registry;
pub mod scope;
pub mod store;
pub mod token;
pub mod types;

pub use account::{AccountRecord, AccountService};
pub use claims::{ClaimsProjector, UserInfoResponse};
pub use config::{ConfigError, OAuthConfig, SupportConfig};
pub use error::AuthError;
pub use http::{OAuthState, oauth_router};
pub use middleware::{AuthenticatedUser, BearerAuth, UserResolver};
pub use oauth::authorize::{AuthorizationError, AuthorizationErrorCode, AuthorizationRequest};
pub use oauth::token::{TokenError, TokenErrorCode, TokenRequest, TokenResponse};
pub use registry::ClientRegistry;
pub use scope::{FixedScopeValidator, ScopeSet, ScopeValidator};
pub use store::{GrantLifetimes, GrantStore, MemoryGrantStore};
pub use token::TokenService;
pub use types::{AccessGrant, AuthorizationCode, Client, IssuedTokens, TokenGrant};

/// Type alias for authorization results.
pub type AuthResult<T> = Result<T, AuthError>;
