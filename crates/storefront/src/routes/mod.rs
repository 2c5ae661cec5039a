//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Storefront page (product grid + cart panel)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (catalog loaded)
//!
//! # Products (HTMX fragments)
//! GET  /products               - Product grid, filtered by ?q= (name) or ?category=
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart panel
//! POST /cart/add               - Add one unit (returns cart panel, triggers toast)
//! POST /cart/remove            - Remove one unit (returns cart panel)
//! POST /cart/checkout          - Place the order (returns dialog + cleared cart panel)
//!
//! # Assets
//! GET  /static/*               - Images and stylesheets
//! ```

pub mod cart;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::catalog::LoadState;
use crate::state::AppState;

/// Create the storefront routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/products", get(products::list))
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/remove", post(cart::remove))
        .route("/cart/checkout", post(cart::checkout))
}

/// Build the complete application: routes, health checks, static files, tracing.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the catalog has loaded.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.catalog().state() {
        LoadState::Ready => StatusCode::OK,
        LoadState::Pending | LoadState::Failed(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
