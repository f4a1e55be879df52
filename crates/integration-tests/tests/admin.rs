//! Catalog management against the fake backend.

#![allow(clippy::unwrap_used)]

use std::io::Write;

use secrecy::SecretString;
use serde_json::json;

use francine_core::{Price, ProductId};
use francine_integration_tests::{FakeBackend, open_storefront};
use francine_storefront::AppError;
use francine_storefront::models::ProductDraft;
use francine_storefront::services::{AdminAction, AdminError};

async fn admin_backend() -> FakeBackend {
    let backend = FakeBackend::start().await.unwrap();
    backend.seed_account("Ana", "ana@example.com", "s3cret", "Admin");
    backend.seed_account("Bo", "bo@example.com", "pw", "Customer");
    backend.seed_product(json!({"_id": "p0001", "name": "Desk Lamp", "price": 899}));
    backend
}

#[tokio::test]
async fn test_writes_without_session_send_nothing() {
    let backend = admin_backend().await;
    let (storefront, _dir) = open_storefront(&backend.base_url());
    let draft = ProductDraft::new("Mug", "", Price::from_cents(250));

    let err = storefront.admin().create(&draft).await.unwrap_err();
    assert!(matches!(err, AdminError::SessionExpired));
    let err = storefront
        .admin()
        .update(&ProductId::new("p0001"), &draft)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::SessionExpired));
    let err = storefront
        .admin()
        .delete(&ProductId::new("p0001"))
        .await
        .unwrap_err();
    assert_eq!(
        AppError::from(err).user_message(),
        "Session expired. Please login again."
    );

    assert!(backend.requests().is_empty());
    assert_eq!(backend.products().len(), 1);
}

#[tokio::test]
async fn test_create_uploads_form_and_refreshes() {
    let backend = admin_backend().await;
    let (mut storefront, _dir) = open_storefront(&backend.base_url());
    storefront
        .login("ana@example.com", &SecretString::from("s3cret".to_owned()))
        .await
        .unwrap();

    let mut image = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    image.write_all(b"\x89PNG fake image").unwrap();

    let draft = ProductDraft::new("  Mug ", "Holds coffee", Price::from_cents(25_050))
        .with_image(image.path());
    let outcome = storefront.admin().create(&draft).await.unwrap();

    assert_eq!(outcome.action, AdminAction::Create);
    let created = outcome.product.unwrap();
    assert_eq!(created.name, "Mug");
    assert_eq!(created.price, Price::from_cents(25_050));
    assert!(created.image_url.unwrap().starts_with("/uploads/"));

    let admin_products = outcome.admin_products.unwrap();
    assert_eq!(admin_products.len(), 2);
    assert!(!outcome.catalog.is_fallback());
    assert_eq!(outcome.catalog.products.len(), 2);

    let request = backend
        .requests_to("/api/products")
        .into_iter()
        .find(|r| r.method == "POST")
        .unwrap();
    assert!(request.authorization.as_deref().unwrap().starts_with("Bearer token-"));
    assert_eq!(request.field("name"), Some("Mug"));
    assert_eq!(request.field("description"), Some("Holds coffee"));
    assert_eq!(request.field("price"), Some("250.50"));
    let upload = request.image().unwrap();
    assert_eq!(upload.content_type.as_deref(), Some("image/png"));
    assert_eq!(upload.len, 15);
}

#[tokio::test]
async fn test_update_and_delete() {
    let backend = admin_backend().await;
    let (mut storefront, _dir) = open_storefront(&backend.base_url());
    storefront
        .login("ana@example.com", &SecretString::from("s3cret".to_owned()))
        .await
        .unwrap();
    let id = ProductId::new("p0001");

    let draft = ProductDraft::new("Desk Lamp XL", "Brighter", Price::from_cents(99_900));
    let outcome = storefront.admin().update(&id, &draft).await.unwrap();
    let listed = outcome.catalog.find(&id).unwrap();
    assert_eq!(listed.name, "Desk Lamp XL");
    assert_eq!(listed.price, Price::from_cents(99_900));

    let outcome = storefront.admin().delete(&id).await.unwrap();
    assert_eq!(outcome.action, AdminAction::Delete);
    assert!(outcome.admin_products.unwrap().is_empty());
    assert!(backend.products().is_empty());

    let err = storefront.admin().delete(&id).await.unwrap_err();
    assert_eq!(AppError::from(err).user_message(), "Product not found");
}

#[tokio::test]
async fn test_customer_token_is_refused_by_backend() {
    let backend = admin_backend().await;
    let (mut storefront, _dir) = open_storefront(&backend.base_url());
    storefront
        .login("bo@example.com", &SecretString::from("pw".to_owned()))
        .await
        .unwrap();

    let err = storefront
        .admin()
        .delete(&ProductId::new("p0001"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AdminError::Rejected {
            action: AdminAction::Delete,
            ..
        }
    ));
    assert_eq!(AppError::from(err).user_message(), "Admin access required");
    assert_eq!(backend.products().len(), 1);
}

#[tokio::test]
async fn test_missing_image_fails_before_request() {
    let backend = admin_backend().await;
    let (mut storefront, dir) = open_storefront(&backend.base_url());
    storefront
        .login("ana@example.com", &SecretString::from("s3cret".to_owned()))
        .await
        .unwrap();

    let draft = ProductDraft::new("Mug", "", Price::from_cents(250))
        .with_image(dir.path().join("missing.png"));
    let err = storefront.admin().create(&draft).await.unwrap_err();

    assert!(matches!(err, AdminError::Image(_)));
    assert!(
        backend
            .requests_to("/api/products")
            .iter()
            .all(|r| r.method != "POST")
    );
}
