//! Product catalog loading.
//!
//! The public catalog never fails to load: when the backend is down,
//! answers with an error, or sends something that is not a product list, the
//! built-in catalog is shown instead.

use francine_core::{Price, ProductId};

use crate::api::ApiClient;
use crate::models::{CatalogSource, Product};

/// A catalog listing and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub source: CatalogSource,
}

impl Catalog {
    /// Look up a product by ID.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Whether this listing is the built-in fallback.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == CatalogSource::Fallback
    }
}

/// Built-in catalog: `(id, name, price in cents, icon)`.
const FALLBACK_CATALOG: [(&str, &str, i64, &str); 20] = [
    ("1", "Neural AI Earbuds Pro", 29_999, "bi-earbuds"),
    ("2", "Quantum LED Smart Watch", 44_900, "bi-smartwatch"),
    ("3", "AR Glasses XR-2000", 79_900, "bi-glasses"),
    ("4", "Portable Solar Power Bank 30W", 8_999, "bi-battery-charging"),
    ("5", "4K Webcam with AI Background", 15_900, "bi-camera-video"),
    ("6", "Mechanical Keyboard RGB", 12_900, "bi-keyboard"),
    ("7", "Wireless Noise-Canceling Headphones", 34_900, "bi-headphones"),
    ("8", "Smart Home Hub Pro", 19_900, "bi-houses"),
    ("9", "USB-C 100W Laptop Dock", 17_900, "bi-hdd-stack"),
    ("10", "Portable SSD 2TB", 24_900, "bi-device-ssd"),
    ("11", "Ergonomic Vertical Mouse", 7_999, "bi-mouse"),
    ("12", "E-Ink Tablet 10.3\"", 39_900, "bi-tablet"),
    ("13", "Wireless Charging Pad 3-in-1", 6_999, "bi-battery-full"),
    ("14", "Streaming Microphone Pro", 14_900, "bi-mic"),
    ("15", "VR Headset Lightweight", 49_900, "bi-display"),
    ("16", "Smart Ring Health Tracker", 27_900, "bi-circle"),
    ("17", "Ultrawide Monitor 34\" Curved", 59_900, "bi-display"),
    ("18", "Desk Lamp with Wireless Charge", 8_900, "bi-lamp"),
    ("19", "Portable Projector 1080p", 32_900, "bi-projector"),
    ("20", "Fitness Tracker Band", 11_900, "bi-activity"),
];

/// The built-in catalog shown when the backend is unavailable.
#[must_use]
pub fn fallback_products() -> Vec<Product> {
    FALLBACK_CATALOG
        .iter()
        .map(|(id, name, cents, icon)| Product {
            id: ProductId::new(*id),
            name: (*name).to_owned(),
            price: Price::from_cents(*cents),
            image_url: None,
            description: None,
            icon: Some((*icon).to_owned()),
        })
        .collect()
}

/// Load the public catalog, falling back to the built-in list on any error.
pub async fn load_catalog(api: &ApiClient) -> Catalog {
    match api.list_products().await {
        Ok(products) => Catalog {
            products,
            source: CatalogSource::Remote,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Catalog unavailable, using built-in products");
            Catalog {
                products: fallback_products(),
                source: CatalogSource::Fallback,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_catalog() {
        let products = fallback_products();
        assert_eq!(products.len(), 20);
        let first = products.first().unwrap();
        assert_eq!(first.id.as_str(), "1");
        assert_eq!(first.price.display(), "₱299.99");
        assert!(products.iter().all(|p| p.icon.is_some()));
    }

    #[test]
    fn test_find() {
        let catalog = Catalog {
            products: fallback_products(),
            source: CatalogSource::Fallback,
        };
        assert!(catalog.is_fallback());
        let product = catalog.find(&ProductId::new("11")).unwrap();
        assert_eq!(product.name, "Ergonomic Vertical Mouse");
        assert!(catalog.find(&ProductId::new("99")).is_none());
    }
}
