//! Catalog browsing.

use francine_storefront::models::UiMode;
use francine_storefront::notice::Notice;
use francine_storefront::storage::Storage;
use francine_storefront::{AppError, Storefront};

use crate::output;

/// List the public catalog; admins also see descriptions.
///
/// Never fails on backend trouble; the built-in catalog is listed instead.
pub async fn list<S: Storage + Clone>(storefront: &mut Storefront<S>) -> Result<(), AppError> {
    let mode = storefront.mode();
    let catalog = storefront.load_catalog().await;
    if catalog.is_fallback() {
        output::warn(&Notice::CatalogOffline.to_string());
    }
    match mode {
        UiMode::Admin => output::admin_products(&catalog.products),
        UiMode::Customer => output::products(&catalog.products),
    }
    Ok(())
}
