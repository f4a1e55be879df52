//! Francine storefront client library.
//!
//! Browsing, a persisted cart, guest checkout, customer accounts and
//! catalog management against the Francine backend. Front ends drive
//! everything through [`state::Storefront`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod notice;
pub mod services;
pub mod state;
pub mod storage;
pub mod stores;

pub use error::{AppError, Result};
pub use state::Storefront;
