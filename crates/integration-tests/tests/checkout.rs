//! Guest checkout against the fake backend.

#![allow(clippy::unwrap_used)]

use serde_json::json;

use francine_core::{Price, ProductId};
use francine_integration_tests::{
    FakeBackend, Route, open_storefront, reopen_storefront, unreachable_base_url,
};
use francine_storefront::AppError;
use francine_storefront::models::Product;
use francine_storefront::services::{CheckoutError, CheckoutForm};

fn product(id: &str, name: &str, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        price: Price::from_cents(cents),
        image_url: None,
        description: None,
        icon: None,
    }
}

#[tokio::test]
async fn test_successful_checkout_clears_cart() {
    let backend = FakeBackend::start().await.unwrap();
    let (mut storefront, dir) = open_storefront(&backend.base_url());

    let widget = product("p1", "Widget", 1000);
    let gadget = product("p2", "Gadget", 500);
    storefront.add_to_cart(&widget).unwrap();
    storefront.add_to_cart(&widget).unwrap();
    storefront.add_to_cart(&gadget).unwrap();

    let form = CheckoutForm::new("Ana Cruz")
        .with_email("ana@example.com")
        .with_address("12 Mabini St");
    let receipt = storefront.checkout(&form).await.unwrap();

    assert_eq!(receipt.count, 3);
    assert_eq!(receipt.total, Price::from_cents(2500));
    assert!(storefront.cart().is_empty());

    // The cleared cart is what survives a restart.
    let reopened = reopen_storefront(&backend.base_url(), dir.path());
    assert!(reopened.cart().is_empty());

    let requests = backend.requests_to("/api/order/guestCheckout");
    assert_eq!(requests.len(), 1);
    let order = requests.first().unwrap().json().unwrap();
    assert_eq!(order["name"], "Ana Cruz");
    assert_eq!(order["email"], "ana@example.com");
    assert_eq!(order["address"], "12 Mabini St");
    assert!(order.get("phone").is_none());
    assert_eq!(order["total"].as_f64(), Some(25.0));
    assert_eq!(order["items"][0]["id"], "p1");
    assert_eq!(order["items"][0]["qty"], 2);
    assert_eq!(order["items"][0]["price"].as_f64(), Some(10.0));
    assert_eq!(order["items"][1]["qty"], 1);
}

#[tokio::test]
async fn test_rejected_checkout_keeps_cart() {
    let backend = FakeBackend::start().await.unwrap();
    backend.respond(
        Route::GuestCheckout,
        200,
        json!({"status": "error", "error": "Out of stock"}),
    );
    let (mut storefront, dir) = open_storefront(&backend.base_url());
    storefront.add_to_cart(&product("p1", "Widget", 1000)).unwrap();

    let err = storefront
        .checkout(&CheckoutForm::new("Ana"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Checkout(CheckoutError::Rejected(_))));
    assert_eq!(err.user_message(), "Out of stock");
    assert_eq!(storefront.cart().count(), 1);
    assert_eq!(reopen_storefront(&backend.base_url(), dir.path()).cart().count(), 1);
}

#[tokio::test]
async fn test_server_error_uses_fallback_message() {
    let backend = FakeBackend::start().await.unwrap();
    backend.respond(Route::GuestCheckout, 500, json!({}));
    let (mut storefront, _dir) = open_storefront(&backend.base_url());
    storefront.add_to_cart(&product("p1", "Widget", 1000)).unwrap();

    let err = storefront
        .checkout(&CheckoutForm::new("Ana"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Checkout failed. Please try again.");
    assert_eq!(storefront.cart().count(), 1);
}

#[tokio::test]
async fn test_unreachable_backend_keeps_cart() {
    let (mut storefront, _dir) = open_storefront(&unreachable_base_url());
    storefront.add_to_cart(&product("p1", "Widget", 1000)).unwrap();

    let err = storefront
        .checkout(&CheckoutForm::new("Ana"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Checkout(CheckoutError::Unreachable(_))));
    assert_eq!(
        err.user_message(),
        "Unable to connect. Make sure the backend is running."
    );
    assert_eq!(storefront.cart().count(), 1);
}

#[tokio::test]
async fn test_validation_happens_before_any_request() {
    let backend = FakeBackend::start().await.unwrap();
    let (mut storefront, _dir) = open_storefront(&backend.base_url());

    let err = storefront
        .checkout(&CheckoutForm::new("Ana"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Your cart is empty");

    storefront.add_to_cart(&product("p1", "Widget", 1000)).unwrap();
    let err = storefront
        .checkout(&CheckoutForm::new("  "))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Please enter your name");

    assert!(backend.requests().is_empty());
}
