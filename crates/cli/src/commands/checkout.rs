//! Guest checkout.

use francine_storefront::notice::Notice;
use francine_storefront::services::CheckoutForm;
use francine_storefront::storage::Storage;
use francine_storefront::{AppError, Storefront};

use crate::output;

/// Submit the cart as a guest order.
pub async fn submit<S: Storage + Clone>(
    storefront: &mut Storefront<S>,
    form: &CheckoutForm,
) -> Result<(), AppError> {
    let receipt = storefront.checkout(form).await?;
    output::notice(&Notice::OrderPlaced);
    output::receipt(&receipt);
    Ok(())
}
