//! User domain types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use green_papaya_core::{CustomerId, Email};

/// The authenticated user, as reported by the commerce API.
///
/// This is the record persisted alongside the token pair; the storefront
/// never mutates it locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Role names granted by the API (e.g., "admin").
    pub roles: BTreeSet<String>,
}

impl UserRecord {
    /// Whether this user carries the given role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
