//! # deskgate-server
//!
//! The deployable Deskgate service: configuration loading, tracing setup,
//! route/CORS wiring, and the production implementations of the external
//! collaborators (`AccountService` over HTTP, portal identity from the
//! gateway header).

pub mod accounts;
pub mod config;
pub mod identity;
pub mod observability;
pub mod server;

pub use accounts::HttpAccountService;
pub use config::{AccountServiceConfig, AppConfig, load_config};
pub use identity::{GatewayIdentity, PORTAL_USER_HEADER};
pub use observability::init_tracing;
pub use server::build_app;
