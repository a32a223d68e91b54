//! OAuth 2.0 endpoint types.
//!
//! Request/response/error types for the authorization and token endpoints,
//! plus client authentication for the token endpoint.

pub mod authorize;
pub mod client_auth;
pub mod token;

pub use authorize::{
    AuthorizationError, AuthorizationErrorCode, AuthorizationRequest, AuthorizationResponse,
};
pub use client_auth::{ClientAuth, authenticate_client, extract_client_auth, parse_basic_auth};
pub use token::{TokenError, TokenErrorCode, TokenRequest, TokenResponse};
