//! Authentication service.
//!
//! Exchanges credentials for a session with the backend and keeps the
//! [`AuthStore`] in step. The store is only touched when the backend issues
//! both a token and a user; every other outcome leaves the cached session as
//! it was.

mod error;

pub use error::{AuthAction, AuthError};

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use francine_core::{AuthToken, Email};

use crate::api::ApiClient;
use crate::api::types::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::Session;
use crate::storage::Storage;
use crate::stores::AuthStore;

/// Authentication service.
pub struct AuthService<'a, S> {
    api: &'a ApiClient,
    store: &'a mut AuthStore<S>,
}

impl<'a, S: Storage> AuthService<'a, S> {
    /// Create a new authentication service.
    pub const fn new(api: &'a ApiClient, store: &'a mut AuthStore<S>) -> Self {
        Self { api, store }
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::MissingField` before
    /// any request if the input is invalid, `Unreachable`/`Rejected` if the
    /// request fails, and `MissingSession` if the backend issued no token.
    #[instrument(skip(self, email, password))]
    pub async fn login(&mut self, email: &str, password: &SecretString) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;
        require("password", password.expose_secret())?;

        let request = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let reply = self
            .api
            .login(&request)
            .await
            .map_err(|e| AuthError::from_api(AuthAction::Login, e))?;
        self.accept(AuthAction::Login, reply)
    }

    /// Register a customer account and log in as it.
    ///
    /// # Errors
    ///
    /// Same as [`AuthService::login`], plus `MissingField("name")` for a
    /// blank name.
    #[instrument(skip(self, name, email, password))]
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, AuthError> {
        let name = name.trim();
        require("name", name)?;
        let email = Email::parse(email)?;
        require("password", password.expose_secret())?;

        let request = RegisterRequest {
            name,
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let reply = self
            .api
            .register(&request)
            .await
            .map_err(|e| AuthError::from_api(AuthAction::Register, e))?;
        self.accept(AuthAction::Register, reply)
    }

    /// Forget the cached session.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session cannot be removed.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.store.clear_session()?;
        Ok(())
    }

    fn accept(&mut self, action: AuthAction, reply: AuthResponse) -> Result<Session, AuthError> {
        let AuthResponse {
            token,
            user,
            message,
        } = reply;

        let token = token.map(AuthToken::new).filter(|token| !token.is_empty());
        let (Some(token), Some(user)) = (token, user) else {
            tracing::warn!(%action, "Backend reply carried no session");
            return Err(AuthError::MissingSession { action, message });
        };

        let session = self.store.set_session(token, user)?;
        Ok(session.clone())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        Err(AuthError::MissingField(field))
    } else {
        Ok(())
    }
}
