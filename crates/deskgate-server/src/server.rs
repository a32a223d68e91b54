//! Router assembly.
//!
//! Mounts the OAuth routes under the portal's account API prefix, the
//! plugin metadata document, and a health probe, with CORS and request
//! tracing applied across the board.

use std::sync::Arc;

use axum::extract::{FromRef, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use deskgate_auth::{
    ClientRegistry, GrantLifetimes, MemoryGrantStore, OAuthState, oauth_router,
};

use crate::accounts::HttpAccountService;
use crate::config::AppConfig;
use crate::identity::GatewayIdentity;

/// Route prefix the portal expects the OAuth endpoints under.
pub const OAUTH_PREFIX: &str = "/api/account/support/oauth";

/// Plugin metadata published to the portal dashboard.
#[derive(Clone)]
pub struct PluginMeta {
    support_portal: String,
    mailbox_id: u64,
}

#[derive(Clone)]
struct AppState {
    oauth: OAuthState,
    meta: PluginMeta,
}

impl FromRef<AppState> for OAuthState {
    fn from_ref(state: &AppState) -> Self {
        state.oauth.clone()
    }
}

impl FromRef<AppState> for PluginMeta {
    fn from_ref(state: &AppState) -> Self {
        state.meta.clone()
    }
}

/// Builds the application router from validated configuration.
///
/// # Errors
///
/// Returns an error if a component cannot be constructed from the
/// configuration; `build_app` is only called after validation, so this
/// indicates a bug rather than an operator mistake.
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let registry = ClientRegistry::from_config(&config.support)?;
    let grants = Arc::new(MemoryGrantStore::new(GrantLifetimes::from(
        &config.support.oauth,
    )));
    let accounts = Arc::new(HttpAccountService::new(&config.account_service)?);

    let oauth = OAuthState::new(registry, grants, accounts, Arc::new(GatewayIdentity));
    let meta = PluginMeta {
        support_portal: config.support.support_portal_url.clone(),
        mailbox_id: config.support.mailbox_id()?,
    };

    Ok(Router::new()
        .nest(OAUTH_PREFIX, oauth_router())
        .route("/api/account/support/meta", get(meta_handler))
        .route("/healthz", get(healthz))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { oauth, meta }))
}

/// Feature metadata the portal dashboard reads to wire up the support tab.
async fn meta_handler(State(meta): State<PluginMeta>) -> Json<serde_json::Value> {
    Json(json!({
        "support": true,
        "support_portal": meta.support_portal,
        "mailbox_id": meta.mailbox_id,
    }))
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
