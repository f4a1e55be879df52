//! User roles as reported by the backend.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Role attached to an authenticated user.
///
/// Only `"Admin"` unlocks catalog management. Any other value the backend
/// sends is kept verbatim so that a persisted session round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum UserRole {
    /// Regular shopper account.
    #[default]
    Customer,
    /// Store administrator.
    Admin,
    /// A role this client does not know about.
    Other(String),
}

impl UserRole {
    /// Whether this role may manage the catalog.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// The wire representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Customer => "Customer",
            Self::Admin => "Admin",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            "Customer" => Self::Customer,
            "Admin" => Self::Admin,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl Serialize for UserRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A role that is `null` or not a string reads as [`UserRole::Customer`].
impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(raw) => Ok(Self::from(raw.as_str())),
            _ => Ok(Self::Customer),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_only_admin_is_admin() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Customer.is_admin());
        assert!(!UserRole::from("admin").is_admin());
    }

    #[test]
    fn test_unknown_role_round_trips() {
        let role: UserRole = serde_json::from_str("\"Staff\"").unwrap();
        assert_eq!(role, UserRole::Other("Staff".to_owned()));
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"Staff\"");
    }

    #[test]
    fn test_known_roles() {
        let role: UserRole = serde_json::from_str("\"Admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
        assert_eq!(UserRole::Customer.to_string(), "Customer");
    }

    #[test]
    fn test_null_role_is_customer() {
        let role: UserRole = serde_json::from_str("null").unwrap();
        assert_eq!(role, UserRole::Customer);
        let role: UserRole = serde_json::from_str("3").unwrap();
        assert_eq!(role, UserRole::Customer);
    }
}
