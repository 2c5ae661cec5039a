//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation returns the re-rendered cart panel; confirmations queued
//! by the cart observer travel back in the `HX-Trigger` header.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use mercadito_core::{CartEntry, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::cart::{Cart, RemoveOutcome};
use crate::checkout::{self, Dialog};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::notify::hx_trigger;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            id: entry.id().as_i32(),
            name: entry.product.name.clone(),
            quantity: entry.quantity.get(),
            price: entry.product.price.to_string(),
            line_price: entry.line_price().to_string(),
            image: entry.product.image.clone(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Whether there is anything to check out.
    #[must_use]
    pub const fn can_checkout(&self) -> bool {
        self.item_count > 0
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = cart.totals();
        Self {
            items: cart.entries().iter().map(CartItemView::from).collect(),
            total: totals.price.to_string(),
            item_count: totals.items,
        }
    }
}

/// Add/remove form data.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: ProductId,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart.html")]
pub struct CartTemplate {
    pub cart: CartView,
}

/// Checkout confirmation fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout.html")]
pub struct CheckoutTemplate {
    pub dialog: Dialog,
    pub cart: CartView,
}

/// Render the cart panel, attaching any queued toasts as an `HX-Trigger`.
fn cart_panel(state: &AppState, cart: CartView) -> Response {
    let mut response = CartTemplate { cart }.into_response();

    if let Some(trigger) = hx_trigger(&state.toasts().drain()) {
        match HeaderValue::from_str(&trigger) {
            Ok(value) => {
                response.headers_mut().insert("HX-Trigger", value);
            }
            Err(e) => tracing::warn!(error = %e, "Dropping toast with invalid header value"),
        }
    }

    response
}

/// Display the cart panel.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> CartTemplate {
    CartTemplate {
        cart: CartView::from(&*state.cart()),
    }
}

/// Add one unit of a product to the cart (HTMX).
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .find_by_id(form.product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let view = {
        let mut cart = state.cart();
        cart.add(&product)?;
        CartView::from(&*cart)
    };
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", &form.product_id.to_string())]),
    );

    Ok(cart_panel(&state, view))
}

/// Remove one unit of a product from the cart (HTMX).
///
/// Removing a product that is not in the cart leaves it unchanged.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let view = {
        let mut cart = state.cart();
        if cart.remove(form.product_id)? == RemoveOutcome::NotInCart {
            tracing::debug!(product_id = %form.product_id, "Remove for product not in cart");
        }
        CartView::from(&*cart)
    };

    Ok(cart_panel(&state, view))
}

/// Place the order: show the confirmation dialog and empty the cart (HTMX).
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Result<Response> {
    let (receipt, view) = {
        let mut cart = state.cart();
        let receipt = checkout::checkout(&mut cart)?;
        (receipt, CartView::from(&*cart))
    };

    let Some(receipt) = receipt else {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    };
    add_breadcrumb("cart", "Checked out", None);

    Ok(CheckoutTemplate {
        dialog: receipt.dialog,
        cart: view,
    }
    .into_response())
}
