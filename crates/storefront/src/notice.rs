//! User-facing notices for completed actions.

use core::fmt;

use crate::models::{Session, UiMode};
use crate::services::AdminAction;

/// Short confirmation shown after an action succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    AddedToCart(String),
    RemovedFromCart(String),
    CartCleared,
    OrderPlaced,
    LoggedIn { name: String, mode: UiMode },
    Registered(String),
    LoggedOut,
    Catalog(AdminAction),
    CatalogOffline,
}

impl Notice {
    /// Greeting for a freshly established session.
    #[must_use]
    pub fn logged_in(session: &Session) -> Self {
        let mode = if session.is_admin() {
            UiMode::Admin
        } else {
            UiMode::Customer
        };
        Self::LoggedIn {
            name: session.user.name.clone(),
            mode,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddedToCart(name) => write!(f, "{name} added to cart"),
            Self::RemovedFromCart(name) => write!(f, "{name} removed from cart"),
            Self::CartCleared => f.write_str("Cart cleared"),
            Self::OrderPlaced => {
                f.write_str("Order placed successfully! Thank you for your purchase.")
            }
            Self::LoggedIn {
                name,
                mode: UiMode::Admin,
            } => write!(f, "Welcome, {name}"),
            Self::LoggedIn {
                name,
                mode: UiMode::Customer,
            } => write!(f, "Welcome back, {name}!"),
            Self::Registered(name) => write!(f, "Account created! Welcome, {name}"),
            Self::LoggedOut => f.write_str("Logged out"),
            Self::Catalog(AdminAction::Create) => f.write_str("Product added!"),
            Self::Catalog(AdminAction::Update) => f.write_str("Product updated!"),
            Self::Catalog(AdminAction::Delete) => f.write_str("Product deleted"),
            Self::CatalogOffline => {
                f.write_str("Backend unavailable; showing the built-in catalog")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionUser;
    use francine_core::{AuthToken, UserRole};

    #[test]
    fn test_cart_notices() {
        assert_eq!(
            Notice::AddedToCart("Widget".to_string()).to_string(),
            "Widget added to cart"
        );
        assert_eq!(
            Notice::RemovedFromCart("Widget".to_string()).to_string(),
            "Widget removed from cart"
        );
        assert_eq!(Notice::CartCleared.to_string(), "Cart cleared");
    }

    #[test]
    fn test_greeting_depends_on_role() {
        let admin = Session {
            token: AuthToken::new("t"),
            user: SessionUser::new("Ana", UserRole::Admin),
        };
        assert_eq!(Notice::logged_in(&admin).to_string(), "Welcome, Ana");

        let customer = Session {
            token: AuthToken::new("t"),
            user: SessionUser::new("Bo", UserRole::Customer),
        };
        assert_eq!(Notice::logged_in(&customer).to_string(), "Welcome back, Bo!");
    }

    #[test]
    fn test_catalog_notices() {
        assert_eq!(Notice::Catalog(AdminAction::Create).to_string(), "Product added!");
        assert_eq!(Notice::Catalog(AdminAction::Delete).to_string(), "Product deleted");
    }
}
