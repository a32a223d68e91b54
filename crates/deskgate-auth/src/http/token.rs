//! Token endpoint handler.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use tracing::{debug, warn};

use super::OAuthState;
use crate::error::AuthError;
use crate::oauth::client_auth::{authenticate_client, extract_client_auth};
use crate::oauth::token::{TokenError, TokenErrorCode, TokenRequest, TokenResponse};

/// OAuth 2.0 token endpoint.
///
/// Accepts a form-encoded body with `grant_type` either
/// `authorization_code` or `refresh_token`. The client authenticates with
/// HTTP Basic Auth or body credentials. Successful responses carry
/// `Cache-Control: no-store`; failures are JSON OAuth error bodies with
/// HTTP 400.
pub async fn token_handler(
    State(state): State<OAuthState>,
    headers: HeaderMap,
    Form(request): Form<TokenRequest>,
) -> Response {
    debug!(grant_type = %request.grant_type, "Processing token request");

    let auth = extract_client_auth(&headers, &request);
    let client = match authenticate_client(&state.registry, auth) {
        Ok(client) => client,
        Err(error) => {
            warn!(error = %error, "Client authentication failed");
            return token_error_response(error);
        }
    };

    let result = match request.grant_type.as_str() {
        "authorization_code" => state.tokens.exchange_code(&request, &client).await,
        "refresh_token" => state.tokens.refresh(&request, &client).await,
        other => Err(AuthError::unsupported_grant_type(other)),
    };

    match result {
        Ok(response) => token_success_response(response),
        Err(error) => {
            warn!(
                client_id = %client.client_id,
                grant_type = %request.grant_type,
                error = %error,
                "Token request failed"
            );
            token_error_response(error)
        }
    }
}

/// Build a successful token response.
fn token_success_response(response: TokenResponse) -> Response {
    (
        StatusCode::OK,
        [("Cache-Control", "no-store"), ("Pragma", "no-cache")],
        Json(response),
    )
        .into_response()
}

/// Build an error response for the token endpoint.
///
/// All OAuth failures are HTTP 400 with a JSON error body; server-side
/// failures fall through to the generic error shape.
fn token_error_response(error: AuthError) -> Response {
    let (code, description) = match error {
        AuthError::InvalidRequest { message } => (TokenErrorCode::InvalidRequest, message),
        AuthError::InvalidClient { message } => (TokenErrorCode::InvalidClient, message),
        AuthError::InvalidGrant { message } => (TokenErrorCode::InvalidGrant, message),
        AuthError::InvalidScope { message } => (TokenErrorCode::InvalidScope, message),
        AuthError::UnsupportedGrantType { grant_type } => (
            TokenErrorCode::UnsupportedGrantType,
            format!("Grant type {grant_type:?} is not supported"),
        ),
        other => return other.into_response(),
    };

    (
        StatusCode::BAD_REQUEST,
        [("Cache-Control", "no-store"), ("Pragma", "no-cache")],
        Json(TokenError::with_description(code, description)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::test_state;
    use crate::scope::ScopeSet;

    fn basic_auth_headers(client_id: &str, secret: &str) -> HeaderMap {
        use base64::Engine;

        let mut headers = HeaderMap::new();
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{client_id}:{secret}"));
        headers.insert("authorization", format!("Basic {encoded}").parse().unwrap());
        headers
    }

    fn code_request(code: &str) -> TokenRequest {
        TokenRequest {
            grant_type: "authorization_code".to_string(),
            code: Some(code.to_string()),
            redirect_uri: Some("https://support.example.com/cb".to_string()),
            client_id: None,
            client_secret: None,
            refresh_token: None,
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn issue_code(state: &OAuthState) -> String {
        state
            .grants
            .issue_code(
                "portal-client",
                42,
                ScopeSet::parse("openid email").unwrap(),
                "https://support.example.com/cb",
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_code_exchange_with_basic_auth() {
        let state = test_state(42);
        let code = issue_code(&state).await;

        let response = token_handler(
            State(state),
            basic_auth_headers("portal-client", "secret123"),
            Form(code_request(&code)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Cache-Control").unwrap(),
            "no-store"
        );
        let body = body_json(response).await;
        assert_eq!(body["token_type"], "bearer");
        assert_eq!(body["scope"], "openid email");
        assert!(body["access_token"].is_string());
        assert!(body["refresh_token"].is_string());
    }

    #[tokio::test]
    async fn test_code_exchange_with_body_credentials() {
        let state = test_state(42);
        let code = issue_code(&state).await;

        let mut request = code_request(&code);
        request.client_id = Some("portal-client".to_string());
        request.client_secret = Some("secret123".to_string());

        let response = token_handler(State(state), HeaderMap::new(), Form(request)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bad_client_secret_is_invalid_client() {
        let state = test_state(42);
        let code = issue_code(&state).await;

        let response = token_handler(
            State(state),
            basic_auth_headers("portal-client", "wrong"),
            Form(code_request(&code)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_client");
    }

    #[tokio::test]
    async fn test_replayed_code_is_invalid_grant() {
        let state = test_state(42);
        let code = issue_code(&state).await;

        let first = token_handler(
            State(state.clone()),
            basic_auth_headers("portal-client", "secret123"),
            Form(code_request(&code)),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = token_handler(
            State(state),
            basic_auth_headers("portal-client", "secret123"),
            Form(code_request(&code)),
        )
        .await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let body = body_json(second).await;
        assert_eq!(body["error"], "invalid_grant");
    }

    #[tokio::test]
    async fn test_redirect_mismatch_is_invalid_grant() {
        let state = test_state(42);
        let code = issue_code(&state).await;

        let mut request = code_request(&code);
        request.redirect_uri = Some("https://support.example.com/elsewhere".to_string());

        let response = token_handler(
            State(state),
            basic_auth_headers("portal-client", "secret123"),
            Form(request),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_grant");
    }

    #[tokio::test]
    async fn test_unsupported_grant_type() {
        let state = test_state(42);
        let mut request = code_request("unused");
        request.grant_type = "client_credentials".to_string();

        let response = token_handler(
            State(state),
            basic_auth_headers("portal-client", "secret123"),
            Form(request),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "unsupported_grant_type");
    }

    #[tokio::test]
    async fn test_refresh_grant() {
        let state = test_state(42);
        let code = issue_code(&state).await;

        let first = token_handler(
            State(state.clone()),
            basic_auth_headers("portal-client", "secret123"),
            Form(code_request(&code)),
        )
        .await;
        let first_body = body_json(first).await;

        let request = TokenRequest {
            grant_type: "refresh_token".to_string(),
            code: None,
            redirect_uri: None,
            client_id: None,
            client_secret: None,
            refresh_token: Some(first_body["refresh_token"].as_str().unwrap().to_string()),
        };
        let response = token_handler(
            State(state),
            basic_auth_headers("portal-client", "secret123"),
            Form(request),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["scope"], "openid email");
        assert_ne!(body["access_token"], first_body["access_token"]);
    }
}
