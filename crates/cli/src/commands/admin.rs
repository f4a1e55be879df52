//! Catalog management commands.
//!
//! # Usage
//!
//! ```bash
//! francine admin list
//! francine admin create -n "Desk Lamp" -d "Warm light" -p 899 -i lamp.jpg
//! francine admin update 64f0c2 -n "Desk Lamp" -p 849
//! francine admin delete 64f0c2
//! ```
//!
//! Writes need a cached session from `francine login`.

use francine_core::ProductId;
use francine_storefront::models::{ProductDraft, UiMode};
use francine_storefront::notice::Notice;
use francine_storefront::services::AdminOutcome;
use francine_storefront::storage::Storage;
use francine_storefront::{AppError, Storefront};

use crate::output;

/// List products with their IDs.
pub async fn list<S: Storage + Clone>(storefront: &Storefront<S>) -> Result<(), AppError> {
    if storefront.mode() != UiMode::Admin {
        output::warn("Not logged in as an administrator; changes will be refused");
    }
    let products = storefront.admin().list().await?;
    output::admin_products(&products);
    Ok(())
}

/// Add a product.
pub async fn create<S: Storage + Clone>(
    storefront: &mut Storefront<S>,
    draft: ProductDraft,
) -> Result<(), AppError> {
    let outcome = storefront.admin().create(&draft).await?;
    finish(storefront, outcome);
    Ok(())
}

/// Replace a product's fields.
pub async fn update<S: Storage + Clone>(
    storefront: &mut Storefront<S>,
    id: &ProductId,
    draft: ProductDraft,
) -> Result<(), AppError> {
    let outcome = storefront.admin().update(id, &draft).await?;
    finish(storefront, outcome);
    Ok(())
}

/// Delete a product.
pub async fn delete<S: Storage + Clone>(
    storefront: &mut Storefront<S>,
    id: &ProductId,
) -> Result<(), AppError> {
    let outcome = storefront.admin().delete(id).await?;
    finish(storefront, outcome);
    Ok(())
}

fn finish<S: Storage + Clone>(storefront: &mut Storefront<S>, outcome: AdminOutcome) {
    let AdminOutcome {
        action,
        product,
        admin_products,
        catalog,
    } = outcome;

    output::notice(&Notice::Catalog(action));
    if let Some(product) = product {
        tracing::debug!(id = %product.id, "Backend echoed product");
    }
    match admin_products {
        Ok(products) => output::admin_products(&products),
        Err(e) => output::warn(&format!("Could not refresh the product list: {e}")),
    }
    storefront.replace_catalog(catalog);
}
