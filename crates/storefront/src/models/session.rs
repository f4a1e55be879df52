//! Session-related types.
//!
//! The session is the `{token, user}` pair returned by login or register and
//! cached on the client between runs.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use francine_core::{AuthToken, UserRole};

/// Profile of the authenticated user.
///
/// Fields this client does not interpret are kept in `extra` so the stored
/// session matches what the backend sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Display name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Role; anything other than `"Admin"` is treated as a customer.
    #[serde(default)]
    pub role: UserRole,
    /// Remaining profile fields (`_id`, `email`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionUser {
    /// Create a user with no extra profile fields.
    #[must_use]
    pub fn new(name: impl Into<String>, role: UserRole) -> Self {
        Self {
            name: name.into(),
            role,
            extra: Map::new(),
        }
    }

    /// Email address reported by the backend, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.extra.get("email").and_then(Value::as_str)
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(name) => name,
        _ => String::new(),
    })
}

/// Authenticated session cached on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for privileged requests.
    pub token: AuthToken,
    /// The user the token belongs to.
    pub user: SessionUser,
}

impl Session {
    /// Whether the session belongs to an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }
}

/// Which surface the client presents, decided by the cached session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Catalog management is available.
    Admin,
    /// Shopping only.
    Customer,
}
