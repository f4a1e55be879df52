//! Domain models for the storefront client.
//!
//! - [`cart`] - line items and the cart they form
//! - [`session`] - the authenticated session cached on the client
//! - [`product`] - catalog entries and admin product drafts

pub mod cart;
pub mod product;
pub mod session;

pub use cart::{Cart, LineItem};
pub use product::{CatalogSource, Product, ProductDraft};
pub use session::{Session, SessionUser, UiMode};
