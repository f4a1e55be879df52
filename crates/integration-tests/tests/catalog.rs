//! Catalog loading against the fake backend.

#![allow(clippy::unwrap_used)]

use serde_json::json;

use francine_core::{Price, ProductId};
use francine_integration_tests::{FakeBackend, Route, open_storefront, unreachable_base_url};
use francine_storefront::models::CatalogSource;

#[tokio::test]
async fn test_remote_catalog_is_normalized() {
    let backend = FakeBackend::start().await.unwrap();
    backend.seed_product(json!({
        "_id": "665f1c",
        "name": "Desk Lamp",
        "price": "899.5",
        "imageUrl": "/uploads/lamp.png",
        "description": "Warm light",
    }));
    backend.seed_product(json!({"id": 7, "name": "Mouse", "price": 79.99, "image": "mouse.jpg"}));
    backend.seed_product(json!({"_id": "x1", "name": "Mystery", "price": "ask"}));

    let (mut storefront, _dir) = open_storefront(&backend.base_url());
    let catalog = storefront.load_catalog().await;

    assert_eq!(catalog.source, CatalogSource::Remote);
    assert_eq!(catalog.products.len(), 3);

    let lamp = catalog.find(&ProductId::new("665f1c")).unwrap();
    assert_eq!(lamp.price, Price::from_cents(89_950));
    assert_eq!(lamp.image_url.as_deref(), Some("/uploads/lamp.png"));
    assert_eq!(lamp.description.as_deref(), Some("Warm light"));

    let mouse = catalog.find(&ProductId::new("7")).unwrap();
    assert_eq!(mouse.image_url.as_deref(), Some("mouse.jpg"));

    let mystery = catalog.find(&ProductId::new("x1")).unwrap();
    assert!(mystery.price.is_zero());
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let backend = FakeBackend::start().await.unwrap();
    backend.respond(Route::ListProducts, 500, json!({"message": "database down"}));

    let (mut storefront, _dir) = open_storefront(&backend.base_url());
    let catalog = storefront.load_catalog().await;

    assert!(catalog.is_fallback());
    assert_eq!(catalog.products.len(), 20);
}

#[tokio::test]
async fn test_non_list_body_falls_back() {
    let backend = FakeBackend::start().await.unwrap();
    backend.respond(Route::ListProducts, 200, json!({"products": []}));

    let (mut storefront, _dir) = open_storefront(&backend.base_url());
    assert!(storefront.load_catalog().await.is_fallback());
}

#[tokio::test]
async fn test_unreachable_backend_falls_back() {
    let (mut storefront, _dir) = open_storefront(&unreachable_base_url());
    let catalog = storefront.load_catalog().await;

    assert!(catalog.is_fallback());
    assert_eq!(catalog.products.len(), 20);
}

#[tokio::test]
async fn test_add_by_id_from_fallback_catalog() {
    let (mut storefront, _dir) = open_storefront(&unreachable_base_url());

    let notice = storefront.add_to_cart_by_id(&ProductId::new("6")).await.unwrap();
    assert_eq!(notice.to_string(), "Mechanical Keyboard RGB added to cart");
    storefront.add_to_cart_by_id(&ProductId::new("6")).await.unwrap();

    assert_eq!(storefront.cart().count(), 2);
    assert_eq!(storefront.cart().total(), Price::from_cents(25_800));

    let missing = storefront.add_to_cart_by_id(&ProductId::new("999")).await;
    assert!(missing.is_err());
    assert_eq!(storefront.cart().count(), 2);
}
