//! Session domain types.

use serde::{Deserialize, Serialize};

use super::user::UserRecord;

/// Access/refresh token pair issued by the auth endpoints.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// The access token attached to authenticated API requests.
    pub access_token: String,
    /// The refresh token for obtaining new access tokens.
    pub refresh_token: String,
}

// Tokens are credentials; keep them out of debug/log output.
impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// A snapshot of the authentication state.
///
/// Invariant: `user` and `tokens` are either both present or both absent.
/// The session store only ever writes whole snapshots, so a token never
/// exists without a user record and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// The authenticated user, if any.
    pub user: Option<UserRecord>,
    /// The credential tokens, if any.
    pub tokens: Option<TokenPair>,
}

impl Session {
    /// The logged-out session.
    #[must_use]
    pub const fn logged_out() -> Self {
        Self {
            user: None,
            tokens: None,
        }
    }

    /// An authenticated session.
    #[must_use]
    pub const fn authenticated(user: UserRecord, tokens: TokenPair) -> Self {
        Self {
            user: Some(user),
            tokens: Some(tokens),
        }
    }

    /// True iff a user record and an access token are both present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.tokens.is_some()
    }

    /// The current access token, if authenticated.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access_token.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use green_papaya_core::{CustomerId, Email};

    use super::*;

    fn user() -> UserRecord {
        UserRecord {
            id: CustomerId::new("u1"),
            name: "Shop Owner".to_string(),
            email: Email::parse("owner@example.com").expect("valid email"),
            roles: BTreeSet::new(),
        }
    }

    #[test]
    fn test_authenticated_iff_both_present() {
        assert!(!Session::logged_out().is_authenticated());

        let session = Session::authenticated(
            user(),
            TokenPair {
                access_token: "at".to_string(),
                refresh_token: "rt".to_string(),
            },
        );
        assert!(session.is_authenticated());
        assert_eq!(session.access_token(), Some("at"));
    }

    #[test]
    fn test_token_pair_debug_redacts() {
        let tokens = TokenPair {
            access_token: "super-secret".to_string(),
            refresh_token: "even-more-secret".to_string(),
        };
        let debug = format!("{tokens:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }
}
