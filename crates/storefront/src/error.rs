//! Unified error handling with Sentry integration.
//!
//! Every flow has its own error type; [`AppError`] gathers them so a front
//! end can turn any failure into one user-facing message. Internal faults
//! (storage, configuration, unexpected responses) are captured to Sentry when
//! it is configured; user mistakes and backend refusals are not.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::{AdminError, AuthError, CheckoutError};
use crate::storage::StorageError;

/// Message shown whenever the backend cannot be reached.
pub const UNREACHABLE_MESSAGE: &str = "Unable to connect. Make sure the backend is running.";

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A backend request failed outside of any specific flow.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Login, registration or logout failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Catalog management failed.
    #[error("Admin error: {0}")]
    Admin(#[from] AdminError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this is an internal fault worth reporting.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Storage(_)
                | Self::Api(ApiError::Decode(_) | ApiError::Url(_))
                | Self::Checkout(CheckoutError::CartNotCleared(_))
                | Self::Auth(AuthError::Storage(_))
        )
    }

    /// Message to show the user.
    ///
    /// Backend-supplied messages are passed through; internal details are
    /// not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(e) => e.to_string(),
            Self::Storage(_) => "Could not save your changes locally.".to_string(),
            Self::Api(e) => api_message(e, "Request failed"),
            Self::Checkout(e) => match e {
                CheckoutError::EmptyCart => "Your cart is empty".to_string(),
                CheckoutError::MissingName => "Please enter your name".to_string(),
                CheckoutError::InvalidEmail(_) => "Please enter a valid email address".to_string(),
                CheckoutError::Unreachable(_) => UNREACHABLE_MESSAGE.to_string(),
                CheckoutError::Rejected(api) => {
                    api_message(api, "Checkout failed. Please try again.")
                }
                CheckoutError::CartNotCleared(_) => {
                    "Order placed, but your cart could not be cleared.".to_string()
                }
            },
            Self::Auth(e) => match e {
                AuthError::InvalidEmail(_) => "Please enter a valid email address".to_string(),
                AuthError::MissingField(field) => format!("Please enter your {field}"),
                AuthError::Unreachable { .. } => UNREACHABLE_MESSAGE.to_string(),
                AuthError::Rejected { action, source } => {
                    api_message(source, action.fallback_message())
                }
                AuthError::MissingSession { action, message } => message
                    .clone()
                    .unwrap_or_else(|| action.fallback_message().to_string()),
                AuthError::Storage(_) => "Could not save your session locally.".to_string(),
            },
            Self::Admin(e) => match e {
                AdminError::SessionExpired => "Session expired. Please login again.".to_string(),
                AdminError::MissingName => "Please enter a product name".to_string(),
                AdminError::Image(source) => source.to_string(),
                AdminError::Unreachable { .. } => UNREACHABLE_MESSAGE.to_string(),
                AdminError::Rejected { action, source } => {
                    api_message(source, action.fallback_message())
                }
            },
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    /// Log the error and, if it is internal, capture it to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command failed"
            );
        } else {
            tracing::debug!(error = %self, "Command failed");
        }
    }
}

fn api_message(err: &ApiError, fallback: &str) -> String {
    if err.is_transport() {
        return UNREACHABLE_MESSAGE.to_string();
    }
    err.server_message().unwrap_or(fallback).to_string()
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after login.
pub fn set_sentry_user(name: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(name.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{AdminAction, AuthAction};

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 42".to_string());
        assert_eq!(err.to_string(), "Not found: product 42");

        let err = AppError::BadRequest("price must be a number".to_string());
        assert_eq!(err.to_string(), "Bad request: price must be a number");
    }

    #[test]
    fn test_checkout_messages() {
        assert_eq!(
            AppError::from(CheckoutError::EmptyCart).user_message(),
            "Your cart is empty"
        );
        assert_eq!(
            AppError::from(CheckoutError::MissingName).user_message(),
            "Please enter your name"
        );
        let rejected = CheckoutError::Rejected(ApiError::Rejected {
            message: Some("Out of stock".to_string()),
        });
        assert_eq!(AppError::from(rejected).user_message(), "Out of stock");
        let silent = CheckoutError::Rejected(ApiError::Server {
            status: 500,
            message: None,
        });
        assert_eq!(
            AppError::from(silent).user_message(),
            "Checkout failed. Please try again."
        );
    }

    #[test]
    fn test_auth_messages_use_action_fallback() {
        let err = AuthError::MissingSession {
            action: AuthAction::Login,
            message: None,
        };
        assert_eq!(AppError::from(err).user_message(), "Login failed");

        let err = AuthError::Rejected {
            action: AuthAction::Register,
            source: ApiError::Server {
                status: 409,
                message: Some("Email already registered".to_string()),
            },
        };
        assert_eq!(AppError::from(err).user_message(), "Email already registered");
    }

    #[test]
    fn test_admin_messages() {
        assert_eq!(
            AppError::from(AdminError::SessionExpired).user_message(),
            "Session expired. Please login again."
        );
        let err = AdminError::Rejected {
            action: AdminAction::Delete,
            source: ApiError::NotFound { message: None },
        };
        assert_eq!(AppError::from(err).user_message(), "Failed to delete product");
    }

    #[test]
    fn test_internal_classification() {
        assert!(AppError::Api(ApiError::Decode("bad".to_string())).is_internal());
        assert!(!AppError::from(CheckoutError::EmptyCart).is_internal());
        assert!(!AppError::from(AdminError::SessionExpired).is_internal());
    }
}
