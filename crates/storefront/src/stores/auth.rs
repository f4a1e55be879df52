//! Persisted authentication session.

use francine_core::AuthToken;

use crate::models::{Session, SessionUser, UiMode};
use crate::storage::{Storage, StorageError, keys, load_json, save_json};

/// The cached `{token, user}` pair, persisted under [`keys::AUTH`].
#[derive(Debug)]
pub struct AuthStore<S> {
    storage: S,
    session: Option<Session>,
}

impl<S: Storage> AuthStore<S> {
    /// Restore the session from storage.
    ///
    /// Malformed or unreadable data, or a session with a blank token, is
    /// treated as logged out.
    pub fn load(storage: S) -> Self {
        let session = match load_json::<Session, _>(&storage, keys::AUTH) {
            Ok(Some(session)) if !session.token.is_empty() => Some(session),
            Ok(Some(_)) => {
                tracing::warn!("Ignoring stored session with an empty token");
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable session");
                None
            }
        };
        Self { storage, session }
    }

    /// Replace any existing session and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written; the previous
    /// session then stays in place.
    pub fn set_session(
        &mut self,
        token: AuthToken,
        user: SessionUser,
    ) -> Result<&Session, StorageError> {
        let session = Session { token, user };
        save_json(&self.storage, keys::AUTH, &session)?;
        tracing::info!(role = %session.user.role, "Session stored");
        Ok(self.session.insert(session))
    }

    /// Remove the session from memory and storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session cannot be removed.
    pub fn clear_session(&mut self) -> Result<(), StorageError> {
        self.storage.remove(keys::AUTH)?;
        if self.session.take().is_some() {
            tracing::info!("Session cleared");
        }
        Ok(())
    }

    /// Bearer token of the current session, if logged in.
    #[must_use]
    pub fn current_token(&self) -> Option<&AuthToken> {
        self.session.as_ref().map(|session| &session.token)
    }

    /// Whether the current session belongs to an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    /// The current session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&SessionUser> {
        self.session.as_ref().map(|session| &session.user)
    }

    /// Surface to present for the current session.
    #[must_use]
    pub fn mode(&self) -> UiMode {
        if self.is_admin() {
            UiMode::Admin
        } else {
            UiMode::Customer
        }
    }
}
