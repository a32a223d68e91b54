//! Axum HTTP surface for the OAuth routes.
//!
//! The router carries three routes, mounted by the server under the
//! portal's account API prefix:
//!
//! - `GET /authorize` - authorization endpoint (portal-authenticated)
//! - `POST /token` - token endpoint (client-authenticated)
//! - `GET|POST /userinfo` - identity claims (bearer-authenticated)

use std::sync::Arc;

use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};

use crate::account::AccountService;
use crate::claims::ClaimsProjector;
use crate::middleware::UserResolver;
use crate::registry::ClientRegistry;
use crate::scope::{FixedScopeValidator, ScopeValidator};
use crate::store::GrantStore;
use crate::token::TokenService;

pub mod authorize;
pub mod token;
pub mod userinfo;

pub use authorize::authorize_handler;
pub use token::token_handler;
pub use userinfo::userinfo_handler;

/// Shared state behind the OAuth routes.
///
/// All components are startup-built singletons; the grant store is the only
/// one holding mutable state, and it serializes internally.
#[derive(Clone)]
pub struct OAuthState {
    /// The single-client registry.
    pub registry: Arc<ClientRegistry>,

    /// Outstanding codes and issued tokens.
    pub grants: Arc<dyn GrantStore>,

    /// Code/refresh exchange service.
    pub tokens: Arc<TokenService>,

    /// Scope-gated claims projection.
    pub projector: Arc<ClaimsProjector>,

    /// Portal identity resolution strategy.
    pub users: Arc<dyn UserResolver>,

    /// Scope validation strategy.
    pub scopes: Arc<dyn ScopeValidator>,
}

impl OAuthState {
    /// Wires the OAuth components over their collaborators, with the fixed
    /// scope vocabulary.
    #[must_use]
    pub fn new(
        registry: ClientRegistry,
        grants: Arc<dyn GrantStore>,
        accounts: Arc<dyn AccountService>,
        users: Arc<dyn UserResolver>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            tokens: Arc::new(TokenService::new(Arc::clone(&grants))),
            projector: Arc::new(ClaimsProjector::new(accounts)),
            grants,
            users,
            scopes: Arc::new(FixedScopeValidator),
        }
    }

    /// Substitutes the scope validation strategy.
    #[must_use]
    pub fn with_scope_validator(mut self, scopes: Arc<dyn ScopeValidator>) -> Self {
        self.scopes = scopes;
        self
    }
}

/// Builds the OAuth subrouter. The caller nests it under its route prefix
/// and applies CORS/trace layers; any host state works as long as
/// [`OAuthState`] can be derived from it.
pub fn oauth_router<S>() -> Router<S>
where
    OAuthState: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/authorize", get(authorize_handler))
        .route("/token", post(token_handler))
        .route("/userinfo", get(userinfo_handler).post(userinfo_handler))
}
