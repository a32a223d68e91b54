//! Core data types for the authorization server.

pub mod client;
pub mod code;
pub mod grant;

pub use client::Client;
pub use code::AuthorizationCode;
pub use grant::{AccessGrant, IssuedTokens, TokenGrant};
