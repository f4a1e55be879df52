//! Cart commands.

use francine_core::ProductId;
use francine_storefront::storage::Storage;
use francine_storefront::{AppError, Storefront};

use crate::output;

/// Print the cart with its total.
pub fn show<S: Storage + Clone>(storefront: &Storefront<S>) {
    output::cart(storefront.cart().cart());
}

/// Add one unit of a catalog product.
pub async fn add<S: Storage + Clone>(
    storefront: &mut Storefront<S>,
    id: &ProductId,
) -> Result<(), AppError> {
    let notice = storefront.add_to_cart_by_id(id).await?;
    output::notice(&notice);
    output::cart_summary(storefront.cart().cart());
    Ok(())
}

/// Remove a product's line.
pub fn remove<S: Storage + Clone>(
    storefront: &mut Storefront<S>,
    id: &ProductId,
) -> Result<(), AppError> {
    match storefront.remove_from_cart(id)? {
        Some(notice) => output::notice(&notice),
        None => output::warn(&format!("Product {id} is not in your cart")),
    }
    output::cart_summary(storefront.cart().cart());
    Ok(())
}

/// Empty the cart.
pub fn clear<S: Storage + Clone>(storefront: &mut Storefront<S>) -> Result<(), AppError> {
    let notice = storefront.clear_cart()?;
    output::notice(&notice);
    Ok(())
}
