//! Guest checkout.
//!
//! Checkout is a single request built from the current cart. The cart is
//! cleared only after the backend confirms the order; any failure leaves it
//! exactly as it was so the same order can be resubmitted.

use thiserror::Error;
use tracing::instrument;

use francine_core::{Email, EmailError, Price};

use crate::api::types::GuestOrder;
use crate::api::{ApiClient, ApiError};
use crate::models::Cart;
use crate::storage::{Storage, StorageError};
use crate::stores::CartStore;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The customer name is blank.
    #[error("customer name is required")]
    MissingName,

    /// The optional email was given but is not an address.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The backend could not be reached.
    #[error("backend unreachable: {0}")]
    Unreachable(#[source] ApiError),

    /// The backend did not accept the order.
    #[error("order rejected: {0}")]
    Rejected(#[source] ApiError),

    /// The order went through but the emptied cart could not be persisted.
    #[error("order placed, but the cart could not be cleared: {0}")]
    CartNotCleared(#[source] StorageError),
}

impl From<ApiError> for CheckoutError {
    fn from(err: ApiError) -> Self {
        if err.is_transport() {
            Self::Unreachable(err)
        } else {
            Self::Rejected(err)
        }
    }
}

/// Customer details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CheckoutForm {
    /// A form with only the required name filled in.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Summary of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    /// Units ordered.
    pub count: u64,
    /// Amount charged.
    pub total: Price,
}

/// Trimmed value, or `None` when blank.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Validate the form against the cart and build the order payload.
///
/// Checks run in order: empty cart, blank name, malformed email.
///
/// # Errors
///
/// Returns `EmptyCart`, `MissingName` or `InvalidEmail`.
pub fn build_order(cart: &Cart, form: &CheckoutForm) -> Result<GuestOrder, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let name = non_blank(Some(form.name.as_str())).ok_or(CheckoutError::MissingName)?;

    let email = non_blank(form.email.as_deref())
        .map(|raw| Email::parse(&raw).map(Email::into_inner))
        .transpose()?;

    Ok(GuestOrder {
        name,
        email,
        phone: non_blank(form.phone.as_deref()),
        address: non_blank(form.address.as_deref()),
        total: cart.total(),
        items: cart.items().to_vec(),
    })
}

/// Checkout service.
pub struct CheckoutService<'a, S> {
    api: &'a ApiClient,
    cart: &'a mut CartStore<S>,
}

impl<'a, S: Storage> CheckoutService<'a, S> {
    /// Create a new checkout service.
    pub const fn new(api: &'a ApiClient, cart: &'a mut CartStore<S>) -> Self {
        Self { api, cart }
    }

    /// Submit the current cart as a guest order.
    ///
    /// Validation happens before any request is made. On success the cart is
    /// cleared; on failure it is left untouched.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `Unreachable`/`Rejected` if the order was
    /// not placed, or `CartNotCleared` if it was placed but the cart could
    /// not be emptied.
    #[instrument(skip(self, form))]
    pub async fn submit(&mut self, form: &CheckoutForm) -> Result<Receipt, CheckoutError> {
        let order = build_order(self.cart.cart(), form)?;
        let receipt = Receipt {
            count: self.cart.count(),
            total: order.total,
        };

        self.api.guest_checkout(&order).await?;
        tracing::info!(count = receipt.count, total = %receipt.total, "Order placed");

        self.cart.clear().map_err(CheckoutError::CartNotCleared)?;
        Ok(receipt)
    }
}
