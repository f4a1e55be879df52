//! Catalog products.

use std::path::PathBuf;

use serde::Serialize;

use francine_core::{Price, ProductId};

/// A normalized catalog entry.
///
/// Built from the backend's loosely-shaped product documents (see
/// `api::conversions`) or from the built-in fallback catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon name shown when there is no image (fallback catalog only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Where a catalog listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Fetched from the backend.
    Remote,
    /// The backend was unavailable; the built-in list was used.
    Fallback,
}

/// Fields an administrator submits to create or update a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Optional image file to upload.
    pub image: Option<PathBuf>,
}

impl ProductDraft {
    /// Create a draft with no image.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            image: None,
        }
    }

    /// Attach an image file.
    #[must_use]
    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image = Some(path.into());
        self
    }
}
