//! REST client for the storefront backend.
//!
//! # Endpoints
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | `GET` | `/api/products` | - |
//! | `POST` | `/api/products` | bearer |
//! | `PUT` | `/api/products/{id}` | bearer |
//! | `DELETE` | `/api/products/{id}` | bearer |
//! | `POST` | `/api/order/guestCheckout` | - |
//! | `POST` | `/api/auth/login` | - |
//! | `POST` | `/api/auth/register` | - |
//!
//! Every response body is read as JSON; a body that is not JSON is treated
//! as an empty object so that a bare error page still yields a status-based
//! error rather than a decode failure.

pub mod conversions;
pub mod types;

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use francine_core::{AuthToken, ProductId};

use crate::config::ClientConfig;
use crate::models::{Product, ProductDraft};

use self::conversions::RawProduct;
use self::types::{AuthResponse, CheckoutResponse, GuestOrder, LoginRequest, RegisterRequest};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS,
    /// timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The resource does not exist.
    #[error("not found{}", format_message(.message.as_deref()))]
    NotFound { message: Option<String> },

    /// The backend answered with a non-success status.
    #[error("server error {status}{}", format_message(.message.as_deref()))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// The backend answered with a success status but refused the request.
    #[error("request rejected{}", format_message(.message.as_deref()))]
    Rejected { message: Option<String> },

    /// A success response did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// A URL could not be built from the configured base.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A file to upload could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_message(message: Option<&str>) -> String {
    message.map_or_else(String::new, |m| format!(": {m}"))
}

impl ApiError {
    /// Message supplied by the backend, if it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::NotFound { message }
            | Self::Server { message, .. }
            | Self::Rejected { message } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether the backend could not be reached at all.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// HTTP client bound to one backend origin.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("francine/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base: config.api_base.clone(),
        })
    }

    /// The backend origin requests are sent to.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    fn product_endpoint(&self, id: &ProductId) -> Result<Url, ApiError> {
        let mut url = self.endpoint("api/products")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id.as_str());
        Ok(url)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the backend answers with a
    /// non-success status, or the body is not a list of products.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint("api/products")?;
        let response = self.client.get(url).send().await?;
        let body = read_body(response).await?;

        let raw: Vec<RawProduct> =
            serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        tracing::debug!(count = raw.len(), "Fetched products");
        Ok(raw.into_iter().map(Product::from).collect())
    }

    /// Create a product.
    ///
    /// Returns the created product when the backend echoes it back.
    ///
    /// # Errors
    ///
    /// Returns error if the image cannot be read, the request fails, or the
    /// backend refuses the product.
    #[instrument(skip(self, token, draft), fields(name = %draft.name))]
    pub async fn create_product(
        &self,
        token: &AuthToken,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, ApiError> {
        let url = self.endpoint("api/products")?;
        let form = product_form(draft).await?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token.expose())
            .multipart(form)
            .send()
            .await?;
        let body = read_body(response).await?;
        Ok(echoed_product(body))
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns error if the image cannot be read, the request fails, or the
    /// backend refuses the update.
    #[instrument(skip(self, token, draft), fields(id = %id))]
    pub async fn update_product(
        &self,
        token: &AuthToken,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, ApiError> {
        let url = self.product_endpoint(id)?;
        let form = product_form(draft).await?;
        let response = self
            .client
            .put(url)
            .bearer_auth(token.expose())
            .multipart(form)
            .send()
            .await?;
        let body = read_body(response).await?;
        Ok(echoed_product(body))
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend refuses the delete.
    #[instrument(skip(self, token), fields(id = %id))]
    pub async fn delete_product(&self, token: &AuthToken, id: &ProductId) -> Result<(), ApiError> {
        let url = self.product_endpoint(id)?;
        let response = self
            .client
            .delete(url)
            .bearer_auth(token.expose())
            .send()
            .await?;
        read_body(response).await?;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submit a guest order.
    ///
    /// The order only counts as placed when the backend answers with a
    /// success status *and* `{"status": "success"}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the order is not accepted.
    #[instrument(skip(self, order), fields(items = order.items.len(), total = %order.total))]
    pub async fn guest_checkout(&self, order: &GuestOrder) -> Result<(), ApiError> {
        let url = self.endpoint("api/order/guestCheckout")?;
        let response = self.client.post(url).json(order).send().await?;
        let body = read_body(response).await?;

        let reply: CheckoutResponse = serde_json::from_value(body).unwrap_or_default();
        if reply.status.as_deref() == Some("success") {
            Ok(())
        } else {
            Err(ApiError::Rejected {
                message: reply.error,
            })
        }
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend refuses the
    /// credentials.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: &LoginRequest<'_>) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint("api/auth/login")?;
        let response = self.client.post(url).json(request).send().await?;
        let body = read_body(response).await?;
        Ok(AuthResponse::from_body(&body))
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend refuses the
    /// registration.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest<'_>) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint("api/auth/register")?;
        let response = self.client.post(url).json(request).send().await?;
        let body = read_body(response).await?;
        Ok(AuthResponse::from_body(&body))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Read a response body, mapping non-success statuses to errors.
///
/// The backend reports failures as `{"message": ...}` or `{"error": ...}`.
async fn read_body(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response.text().await?;
    let body = serde_json::from_str::<Value>(&text)
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

    if status.is_success() {
        return Ok(body);
    }

    let message = ["message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_owned);

    tracing::debug!(status = status.as_u16(), ?message, "Backend returned an error");

    if status == StatusCode::NOT_FOUND {
        Err(ApiError::NotFound { message })
    } else {
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

/// Decode a product echoed back by a create/update call, if there is one.
fn echoed_product(body: Value) -> Option<Product> {
    if !body.is_object() {
        return None;
    }
    serde_json::from_value::<RawProduct>(body)
        .ok()
        .map(Product::from)
        .filter(|product| !product.id.is_empty())
}

/// Build the multipart body shared by create and update.
async fn product_form(draft: &ProductDraft) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("name", draft.name.trim().to_owned())
        .text("description", draft.description.trim().to_owned())
        .text("price", draft.price.to_string());

    if let Some(path) = &draft.image {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ApiError::Attachment {
                path: path.clone(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(image_mime(path))?;
        form = form.part("image", part);
    }

    Ok(form)
}

/// MIME type for an image file, from its extension.
fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
