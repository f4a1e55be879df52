//! Business flows of the storefront client.
//!
//! # Services
//!
//! - `auth` - login, registration and logout against the backend
//! - `catalog` - product listing with the built-in fallback catalog
//! - `checkout` - guest order validation and submission
//! - `admin` - catalog management for administrators
//!
//! Services borrow the REST client and the stores they act on; they hold no
//! state of their own.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod checkout;

pub use admin::{AdminAction, AdminError, AdminOutcome, AdminService};
pub use auth::{AuthAction, AuthError, AuthService};
pub use catalog::{Catalog, fallback_products, load_catalog};
pub use checkout::{CheckoutError, CheckoutForm, CheckoutService, Receipt};
