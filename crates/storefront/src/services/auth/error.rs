//! Authentication error types.

use core::fmt;

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Which authentication request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Register,
}

impl AuthAction {
    /// Message shown when the backend gives no reason.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Register => "Registration failed",
        }
    }
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("login"),
            Self::Register => f.write_str("registration"),
        }
    }
}

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] francine_core::EmailError),

    /// A required form field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The backend could not be reached.
    #[error("{action} failed: backend unreachable: {source}")]
    Unreachable {
        action: AuthAction,
        #[source]
        source: ApiError,
    },

    /// The backend refused the request.
    #[error("{action} rejected: {source}")]
    Rejected {
        action: AuthAction,
        #[source]
        source: ApiError,
    },

    /// The backend answered without issuing a token (or without a user).
    #[error("{action} response did not include a session")]
    MissingSession {
        action: AuthAction,
        message: Option<String>,
    },

    /// The session could not be persisted or removed.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Wrap a REST error for the given action.
    #[must_use]
    pub fn from_api(action: AuthAction, source: ApiError) -> Self {
        if source.is_transport() {
            Self::Unreachable { action, source }
        } else {
            Self::Rejected { action, source }
        }
    }
}
