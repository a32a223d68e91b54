//! Authorization endpoint handler.

use axum::extract::{Query, State};
use axum::http::{StatusCode, header::LOCATION};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};
use url::Url;

use super::OAuthState;
use crate::error::AuthError;
use crate::middleware::AuthenticatedUser;
use crate::oauth::authorize::{
    AuthorizationError, AuthorizationRequest, AuthorizationResponse, validate_authorization,
};

/// OAuth 2.0 authorization endpoint.
///
/// Requires a portal-authenticated caller (the [`AuthenticatedUser`]
/// extractor rejects anonymous requests with 401 before OAuth validation
/// runs). Validates the request against the registered client, mints an
/// authorization code, and 302-redirects back to the support portal with
/// `code` and the echoed `state`. Validation failures redirect with an
/// OAuth error code and the echoed `state`.
///
/// A missing or unparseable `redirect_uri` cannot be answered by redirect
/// and yields a direct 400 instead.
pub async fn authorize_handler(
    State(state): State<OAuthState>,
    user: AuthenticatedUser,
    Query(request): Query<AuthorizationRequest>,
) -> Response {
    let Some(redirect_raw) = request.redirect_uri.clone() else {
        return AuthError::invalid_request("Missing redirect_uri parameter").into_response();
    };
    let Ok(redirect) = Url::parse(&redirect_raw) else {
        return AuthError::invalid_request("redirect_uri is not a valid URL").into_response();
    };

    let scope = match validate_authorization(
        &state.registry,
        state.scopes.as_ref(),
        &request,
        &redirect,
    ) {
        Ok(scope) => scope,
        Err(error) => {
            warn!(error = %error.error, "Authorization request rejected");
            return error_redirect(&error, &redirect_raw);
        }
    };

    // Validation proved the client exists, so client_id is present.
    let Some(client_id) = request.client_id.as_deref() else {
        return AuthError::invalid_request("Missing client_id parameter").into_response();
    };

    let code = match state
        .grants
        .issue_code(client_id, user.0, scope, &redirect_raw)
        .await
    {
        Ok(code) => code,
        Err(error) => return error.into_response(),
    };

    debug!(client_id, user_id = user.0, "Authorization granted");
    let response = AuthorizationResponse::new(code, request.state.clone());
    match response.to_redirect_url(&redirect_raw) {
        Ok(url) => found(&url),
        Err(_) => AuthError::internal("Failed to build redirect URL").into_response(),
    }
}

fn error_redirect(error: &AuthorizationError, redirect_uri: &str) -> Response {
    match error.to_redirect_url(redirect_uri) {
        Ok(url) => found(&url),
        Err(_) => AuthError::invalid_request("redirect_uri is not a valid URL").into_response(),
    }
}

fn found(url: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, url.to_string())]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::test_state;

    fn request() -> AuthorizationRequest {
        AuthorizationRequest {
            response_type: Some("code".to_string()),
            client_id: Some("portal-client".to_string()),
            redirect_uri: Some("https://support.example.com/oauth/callback".to_string()),
            scope: Some("openid email".to_string()),
            state: Some("xyz".to_string()),
        }
    }

    fn location(response: &Response) -> String {
        response
            .headers()
            .get(LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_successful_authorization_redirects_with_code() {
        let state = test_state(42);
        let response =
            authorize_handler(State(state), AuthenticatedUser(42), Query(request())).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = location(&response);
        assert!(location.starts_with("https://support.example.com/oauth/callback?"));
        assert!(location.contains("code="));
        assert!(location.contains("state=xyz"));
    }

    #[tokio::test]
    async fn test_invalid_scope_redirects_with_error_and_state() {
        let state = test_state(42);
        let mut req = request();
        req.scope = Some("openid admin".to_string());
        let response = authorize_handler(State(state), AuthenticatedUser(42), Query(req)).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = location(&response);
        assert!(location.contains("error=invalid_scope"));
        assert!(location.contains("state=xyz"));
        assert!(!location.contains("code="));
    }

    #[tokio::test]
    async fn test_unknown_client_redirects_with_error() {
        let state = test_state(42);
        let mut req = request();
        req.client_id = Some("someone-else".to_string());
        let response = authorize_handler(State(state), AuthenticatedUser(42), Query(req)).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert!(location(&response).contains("error=unauthorized_client"));
    }

    #[tokio::test]
    async fn test_missing_redirect_uri_is_direct_400() {
        let state = test_state(42);
        let mut req = request();
        req.redirect_uri = None;
        let response = authorize_handler(State(state), AuthenticatedUser(42), Query(req)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unparseable_redirect_uri_is_direct_400() {
        let state = test_state(42);
        let mut req = request();
        req.redirect_uri = Some("::not a url::".to_string());
        let response = authorize_handler(State(state), AuthenticatedUser(42), Query(req)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
