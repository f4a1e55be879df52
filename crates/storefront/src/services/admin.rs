//! Catalog management for administrators.
//!
//! Every write needs the cached session token; without one the operation
//! fails before any request is made. The backend remains the authority on
//! whether the token may actually write.
//!
//! There is no local cache to reconcile: after each successful write both
//! the admin listing and the public catalog are fetched again and returned
//! with the outcome.

use core::fmt;

use thiserror::Error;
use tracing::instrument;

use francine_core::{AuthToken, ProductId};

use crate::api::{ApiClient, ApiError};
use crate::models::{Product, ProductDraft};
use crate::services::catalog::{Catalog, load_catalog};
use crate::storage::Storage;
use crate::stores::AuthStore;

/// Which catalog write was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Create,
    Update,
    Delete,
}

impl AdminAction {
    /// Message shown when the backend gives no reason.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Create => "Failed to add product",
            Self::Update => "Failed to update product",
            Self::Delete => "Failed to delete product",
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Update => f.write_str("update"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// Errors that can occur during catalog management.
#[derive(Debug, Error)]
pub enum AdminError {
    /// No session token is cached.
    #[error("no session token; log in again")]
    SessionExpired,

    /// The product name is blank.
    #[error("product name is required")]
    MissingName,

    /// The image to upload could not be read.
    #[error("image unavailable: {0}")]
    Image(#[source] ApiError),

    /// The backend could not be reached.
    #[error("product {action} failed: backend unreachable: {source}")]
    Unreachable {
        action: AdminAction,
        #[source]
        source: ApiError,
    },

    /// The backend refused the write.
    #[error("product {action} rejected: {source}")]
    Rejected {
        action: AdminAction,
        #[source]
        source: ApiError,
    },
}

impl AdminError {
    fn from_api(action: AdminAction, source: ApiError) -> Self {
        match source {
            ApiError::Transport(_) => Self::Unreachable { action, source },
            ApiError::Attachment { .. } => Self::Image(source),
            _ => Self::Rejected { action, source },
        }
    }
}

/// Result of a successful catalog write.
#[derive(Debug)]
pub struct AdminOutcome {
    pub action: AdminAction,
    /// The product as echoed back by the backend, when it sends one.
    pub product: Option<Product>,
    /// Refreshed admin listing (no fallback; a failed refresh is reported).
    pub admin_products: Result<Vec<Product>, ApiError>,
    /// Refreshed public catalog.
    pub catalog: Catalog,
}

/// Catalog management service.
pub struct AdminService<'a, S> {
    api: &'a ApiClient,
    auth: &'a AuthStore<S>,
}

impl<'a, S: Storage> AdminService<'a, S> {
    /// Create a new catalog management service.
    pub const fn new(api: &'a ApiClient, auth: &'a AuthStore<S>) -> Self {
        Self { api, auth }
    }

    /// Fetch the admin listing.
    ///
    /// # Errors
    ///
    /// Returns error if the products cannot be fetched.
    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        self.api.list_products().await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `SessionExpired` or `MissingName` before any request, or a
    /// request error.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: &ProductDraft) -> Result<AdminOutcome, AdminError> {
        let token = self.token()?;
        validate(draft)?;
        let product = self
            .api
            .create_product(token, draft)
            .await
            .map_err(|e| AdminError::from_api(AdminAction::Create, e))?;
        Ok(self.refresh(AdminAction::Create, product).await)
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns `SessionExpired` or `MissingName` before any request, or a
    /// request error.
    #[instrument(skip(self, draft), fields(id = %id))]
    pub async fn update(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<AdminOutcome, AdminError> {
        let token = self.token()?;
        validate(draft)?;
        let product = self
            .api
            .update_product(token, id, draft)
            .await
            .map_err(|e| AdminError::from_api(AdminAction::Update, e))?;
        Ok(self.refresh(AdminAction::Update, product).await)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `SessionExpired` before any request, or a request error.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<AdminOutcome, AdminError> {
        let token = self.token()?;
        self.api
            .delete_product(token, id)
            .await
            .map_err(|e| AdminError::from_api(AdminAction::Delete, e))?;
        Ok(self.refresh(AdminAction::Delete, None).await)
    }

    fn token(&self) -> Result<&'a AuthToken, AdminError> {
        let auth: &'a AuthStore<S> = self.auth;
        auth.current_token().ok_or(AdminError::SessionExpired)
    }

    async fn refresh(&self, action: AdminAction, product: Option<Product>) -> AdminOutcome {
        tracing::info!(%action, "Catalog changed, refreshing views");
        let admin_products = self.api.list_products().await;
        if let Err(e) = &admin_products {
            tracing::warn!(error = %e, "Failed to refresh admin listing");
        }
        let catalog = load_catalog(self.api).await;
        AdminOutcome {
            action,
            product,
            admin_products,
            catalog,
        }
    }
}

fn validate(draft: &ProductDraft) -> Result<(), AdminError> {
    if draft.name.trim().is_empty() {
        return Err(AdminError::MissingName);
    }
    Ok(())
}
