//! Catalog listing.

use mercadito_core::Product;

use super::{CommandError, Context};

/// One listing line for `product`.
fn format_product(product: &Product) -> String {
    format!(
        "{:>4}  {:<28} {:>10}  {}",
        product.id,
        product.name,
        product.price.to_string(),
        product.category
    )
}

/// List products, optionally filtered by name or category.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn list(
    ctx: &Context,
    search: Option<&str>,
    category: Option<&str>,
) -> Result<(), CommandError> {
    let catalog = ctx.catalog().await?;

    let products: Vec<&Product> = match (search, category) {
        (_, Some(category)) => catalog.find_by_category(category).collect(),
        (Some(search), None) => catalog.find_by_name_contains(search).collect(),
        (None, None) => catalog.products().iter().collect(),
    };

    if products.is_empty() {
        tracing::info!("No products found");
        return Ok(());
    }

    for product in &products {
        tracing::info!("{}", format_product(product));
    }
    tracing::info!("{} product(s)", products.len());
    Ok(())
}
