//! Cart management.

use mercadito_core::ProductId;
use mercadito_storefront::cart::{Cart, RemoveOutcome};
use mercadito_storefront::checkout;

use super::{CommandError, Context};

/// Log the cart contents and totals.
fn report(cart: &Cart) {
    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    for entry in cart.entries() {
        tracing::info!(
            "{:>4}  {:<28} {:>3} x {:>10} = {:>10}",
            entry.id(),
            entry.product.name,
            entry.quantity,
            entry.product.price.to_string(),
            entry.line_price().to_string()
        );
    }
    let totals = cart.totals();
    tracing::info!("Items: {}  Total: {}", totals.items, totals.price);
}

/// Show the cart.
pub fn show(ctx: &Context) {
    report(&ctx.cart());
}

/// Add one unit of product `id`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the product does not
/// exist, or the cart cannot be saved.
pub async fn add(ctx: &Context, id: ProductId) -> Result<(), CommandError> {
    let catalog = ctx.catalog().await?;
    let product = catalog
        .find_by_id(id)
        .ok_or(CommandError::UnknownProduct(id))?;

    let mut cart = ctx.cart();
    cart.add(product)?;
    report(&cart);
    Ok(())
}

/// Remove one unit of product `id`.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn remove(ctx: &Context, id: ProductId) -> Result<(), CommandError> {
    let mut cart = ctx.cart();
    match cart.remove(id)? {
        RemoveOutcome::Decremented(quantity) => {
            tracing::info!("Product {id}: {quantity} left in the cart");
        }
        RemoveOutcome::Removed => tracing::info!("Product {id} removed from the cart"),
        RemoveOutcome::NotInCart => tracing::info!("Product {id} is not in the cart"),
    }
    report(&cart);
    Ok(())
}

/// Place the order and empty the cart.
///
/// # Errors
///
/// Returns an error if the persisted cart cannot be deleted.
pub fn checkout(ctx: &Context) -> Result<(), CommandError> {
    let mut cart = ctx.cart();
    match checkout::checkout(&mut cart)? {
        Some(receipt) => {
            tracing::info!("{}", receipt.dialog.title);
            tracing::info!("{}", receipt.dialog.text);
            tracing::info!(
                "Items: {}  Total: {}",
                receipt.totals.items,
                receipt.totals.price
            );
        }
        None => tracing::info!("Cart is empty, nothing to check out"),
    }
    Ok(())
}

/// Empty the cart without placing an order.
///
/// # Errors
///
/// Returns an error if the persisted cart cannot be deleted.
pub fn clear(ctx: &Context) -> Result<(), CommandError> {
    ctx.cart().clear()?;
    tracing::info!("Cart cleared");
    Ok(())
}
