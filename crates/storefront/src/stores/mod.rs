//! Persisted client-side state containers.
//!
//! Each store owns its in-memory state plus a handle to the [`Storage`]
//! backend it persists to. Mutations persist the next state first and only
//! then commit it in memory, so storage and memory agree whenever a call
//! returns, and a failed write leaves both untouched.
//!
//! [`Storage`]: crate::storage::Storage

mod auth;
mod cart;

pub use auth::AuthStore;
pub use cart::CartStore;
