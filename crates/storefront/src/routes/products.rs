//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use mercadito_core::Product;
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{Catalog, LoadState};
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub category: String,
    pub image: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.price.to_string(),
            category: product.category.clone(),
            image: product.image.clone(),
        }
    }
}

/// Product filter query parameters.
///
/// `q` filters by name, `category` by exact label. When both are given the
/// category wins, matching the category buttons which clear the search box.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

/// Storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub products: Vec<ProductView>,
    pub categories: Vec<String>,
    pub notice: Option<String>,
    pub cart: CartView,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub products: Vec<ProductView>,
    pub notice: Option<String>,
}

/// Run the product query against the catalog.
fn select(catalog: &Catalog, query: &ProductQuery) -> Vec<ProductView> {
    let selected: Vec<&Product> = match (&query.category, &query.q) {
        (Some(category), _) if !category.is_empty() => {
            catalog.find_by_category(category).collect()
        }
        (_, Some(q)) => catalog.find_by_name_contains(q).collect(),
        _ => catalog.products().iter().collect(),
    };
    selected.into_iter().map(ProductView::from).collect()
}

/// Message shown above the grid, if any.
fn notice(state: &LoadState, shown: usize) -> Option<String> {
    match state {
        LoadState::Pending => Some("Loading products...".to_string()),
        LoadState::Failed(_) => {
            Some("The catalog could not be loaded. Please try again later.".to_string())
        }
        LoadState::Ready if shown == 0 => Some("No products match your search.".to_string()),
        LoadState::Ready => None,
    }
}

/// Display the storefront page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> IndexTemplate {
    let (products, categories, notice) = {
        let catalog = state.catalog();
        let products = select(&catalog, &ProductQuery::default());
        let categories = catalog.categories().into_iter().map(String::from).collect();
        let notice = notice(catalog.state(), products.len());
        (products, categories, notice)
    };
    let cart = CartView::from(&*state.cart());

    IndexTemplate {
        products,
        categories,
        notice,
        cart,
    }
}

/// Product grid filtered by name or category (HTMX).
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> ProductGridTemplate {
    let catalog = state.catalog();
    let products = select(&catalog, &query);
    let notice = notice(catalog.state(), products.len());

    ProductGridTemplate { products, notice }
}

#[cfg(test)]
mod tests {
    use mercadito_core::{Price, ProductId};

    use super::*;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.install(vec![
            Product::new(ProductId::new(1), "Mouse", Price::from_units(10), "Tech"),
            Product::new(ProductId::new(2), "Mug", Price::from_units(5), "Home"),
        ]);
        catalog
    }

    fn names(views: &[ProductView]) -> Vec<&str> {
        views.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn test_select_everything_by_default() {
        assert_eq!(names(&select(&catalog(), &ProductQuery::default())), vec!["Mouse", "Mug"]);
    }

    #[test]
    fn test_select_by_name() {
        let query = ProductQuery {
            q: Some("MOU".to_string()),
            category: None,
        };
        assert_eq!(names(&select(&catalog(), &query)), vec!["Mouse"]);
    }

    #[test]
    fn test_select_by_category_wins() {
        let query = ProductQuery {
            q: Some("mouse".to_string()),
            category: Some("Home".to_string()),
        };
        assert_eq!(names(&select(&catalog(), &query)), vec!["Mug"]);
    }

    #[test]
    fn test_notice() {
        assert!(notice(&LoadState::Pending, 0).is_some());
        assert!(notice(&LoadState::Failed("boom".to_string()), 0).is_some());
        assert!(notice(&LoadState::Ready, 0).is_some());
        assert!(notice(&LoadState::Ready, 2).is_none());
    }

    #[test]
    fn test_product_view_formats_price() {
        let product = Product::new(ProductId::new(1), "Mouse", Price::from_units(10), "Tech")
            .with_image("mouse.jpg");
        let view = ProductView::from(&product);
        assert_eq!(view.price, "$10.00");
        assert_eq!(view.image.as_deref(), Some("mouse.jpg"));
    }
}
