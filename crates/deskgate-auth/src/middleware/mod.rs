//! Request extractors for authentication.
//!
//! - [`BearerAuth`] resolves an `Authorization: Bearer` token to its grant
//! - [`AuthenticatedUser`] resolves the portal user behind the request via
//!   the injected [`UserResolver`] strategy

pub mod bearer;
pub mod identity;

pub use bearer::BearerAuth;
pub use identity::{AuthenticatedUser, UserResolver};
