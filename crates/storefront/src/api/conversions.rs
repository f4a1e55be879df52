//! Normalization of backend product documents.
//!
//! Product documents come from more than one generation of the backend:
//! the ID may be `_id` or `id` (string or number), the image may be
//! `imageUrl` or `image`, and the price may be a number or a numeric string.
//! [`RawProduct`] accepts all of these and converts to a clean [`Product`].

use serde::Deserialize;
use serde_json::Value;

use francine_core::{Price, ProductId};

use crate::models::Product;

/// A product document exactly as the backend sent it.
#[derive(Debug, Default, Deserialize)]
pub struct RawProduct {
    #[serde(rename = "_id", default)]
    pub mongo_id: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub price: Price,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<Value>,
    #[serde(default)]
    pub image: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub icon: Option<Value>,
}

/// Render a scalar JSON value as text; blanks and non-scalars are absent.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        let id = scalar_text(raw.mongo_id.as_ref())
            .or_else(|| scalar_text(raw.id.as_ref()))
            .unwrap_or_default();

        Self {
            id: ProductId::new(id),
            name: scalar_text(raw.name.as_ref()).unwrap_or_default(),
            price: raw.price,
            image_url: scalar_text(raw.image_url.as_ref())
                .or_else(|| scalar_text(raw.image.as_ref())),
            description: scalar_text(raw.description.as_ref()),
            icon: scalar_text(raw.icon.as_ref()),
        }
    }
}
