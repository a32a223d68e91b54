//! OAuth scope handling.
//!
//! The service grants scopes from a fixed vocabulary: `openid`, `profile`,
//! and `email`. A request containing any other scope token is rejected as a
//! whole with `invalid_scope`.

use std::fmt;

use crate::AuthResult;
use crate::error::AuthError;

/// The set of scopes granted to an authorization.
///
/// Parsed from the space-separated `scope` request parameter. Duplicate
/// tokens collapse; an empty parameter parses to the empty set (claims are
/// then limited to `sub`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScopeSet {
    /// OpenID Connect base scope.
    pub openid: bool,

    /// Grants the `name`, `given_name`, and `family_name` claims.
    pub profile: bool,

    /// Grants the `email` and `email_verified` claims.
    pub email: bool,
}

impl ScopeSet {
    /// Parses a space-separated scope string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidScope` if any token is outside the allowed
    /// vocabulary. One bad token invalidates the whole request.
    pub fn parse(scope: &str) -> AuthResult<Self> {
        let mut scopes = Self::default();
        for token in scope.split_whitespace() {
            match token {
                "openid" => scopes.openid = true,
                "profile" => scopes.profile = true,
                "email" => scopes.email = true,
                other => {
                    return Err(AuthError::invalid_scope(format!(
                        "Unknown scope: {other}"
                    )));
                }
            }
        }
        Ok(scopes)
    }

    /// Returns `true` if no scope was granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.openid && !self.profile && !self.email
    }
}

/// Strategy for validating the requested `scope` parameter.
///
/// Injected at construction so tests (and future deployments with a wider
/// vocabulary) can substitute the policy without touching the endpoints.
pub trait ScopeValidator: Send + Sync {
    /// Validates a space-separated scope string into a granted set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidScope` when the request asks for anything the policy
    /// does not grant.
    fn validate(&self, scope: &str) -> AuthResult<ScopeSet>;
}

/// The production policy: exactly the fixed `openid profile email`
/// vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedScopeValidator;

impl ScopeValidator for FixedScopeValidator {
    fn validate(&self, scope: &str) -> AuthResult<ScopeSet> {
        ScopeSet::parse(scope)
    }
}

impl fmt::Display for ScopeSet {
    /// Renders the set in canonical `openid profile email` order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (granted, name) in [
            (self.openid, "openid"),
            (self.profile, "profile"),
            (self.email, "email"),
        ] {
            if granted {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_vocabulary() {
        let scopes = ScopeSet::parse("openid profile email").unwrap();
        assert!(scopes.openid);
        assert!(scopes.profile);
        assert!(scopes.email);
    }

    #[test]
    fn test_parse_subset() {
        let scopes = ScopeSet::parse("openid email").unwrap();
        assert!(scopes.openid);
        assert!(!scopes.profile);
        assert!(scopes.email);
    }

    #[test]
    fn test_parse_empty() {
        let scopes = ScopeSet::parse("").unwrap();
        assert!(scopes.is_empty());
    }

    #[test]
    fn test_parse_duplicates_collapse() {
        let scopes = ScopeSet::parse("openid openid").unwrap();
        assert_eq!(scopes.to_string(), "openid");
    }

    #[test]
    fn test_unknown_scope_rejects_whole_set() {
        let result = ScopeSet::parse("openid admin");
        assert!(matches!(result, Err(AuthError::InvalidScope { .. })));
    }

    #[test]
    fn test_display_canonical_order() {
        // Request order does not matter; output is canonical.
        let scopes = ScopeSet::parse("email openid").unwrap();
        assert_eq!(scopes.to_string(), "openid email");
    }
}
