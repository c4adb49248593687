//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Pages
//! GET  /                                - Home page
//! GET  /about                           - About
//! GET  /services                        - Service packages
//! GET  /portfolio                       - Portfolio
//! GET  /contact                         - Contact form
//!
//! # Cart (HTML forms, redirect to /cart)
//! GET  /cart                            - Cart page
//! POST /cart/add                        - Add a catalog package
//! POST /cart/update                     - Set quantity
//! POST /cart/remove                     - Remove line
//!
//! # JSON API
//! GET    /api/services                  - Catalog
//! GET    /api/cart                      - Cart summary
//! POST   /api/cart/items                - Add item
//! PATCH  /api/cart/items/{id}           - Patch item
//! PUT    /api/cart/items/{id}/quantity  - Set quantity
//! DELETE /api/cart/items/{id}           - Remove item
//! GET    /api/checkout/draft            - Checkout draft
//! PUT    /api/checkout/draft            - Update draft
//! DELETE /api/checkout/draft            - Discard draft
//! POST   /api/checkout/continue         - Gate to payment
//! POST   /api/checkout/confirm          - Confirm payment
//! POST   /api/contact                   - Contact form submission
//! ```

pub mod cart;
pub mod checkout;
pub mod contact;
pub mod pages;

use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::{
    SESSION_SWEEP_INTERVAL, VisitorSessionStore, create_session_layer, request_id_middleware,
    request_span, security_headers_middleware,
};
use crate::state::AppState;

/// Create the page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/services", get(pages::services))
        .route("/portfolio", get(pages::portfolio))
        .route("/contact", get(pages::contact))
}

/// Create the cart form routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(pages::catalog_api))
        .route("/cart", get(cart::summary))
        .route("/cart/items", post(cart::add_item))
        .route(
            "/cart/items/{id}",
            patch(cart::patch_item).delete(cart::remove_item),
        )
        .route("/cart/items/{id}/quantity", put(cart::set_quantity))
        .route(
            "/checkout/draft",
            get(checkout::get_draft)
                .put(checkout::update_draft)
                .delete(checkout::clear_draft),
        )
        .route("/checkout/continue", post(checkout::continue_to_payment))
        .route("/checkout/confirm", post(checkout::confirm))
        .route("/contact", post(contact::submit))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(page_routes())
        .nest("/cart", cart_routes())
        .nest("/api", api_routes())
}

/// Build the complete application with middleware and state.
///
/// Must be called inside a Tokio runtime: it starts the session sweep task,
/// which stops once the returned router is dropped.
pub fn app(state: AppState) -> Router {
    let store = VisitorSessionStore::new();
    let _sweeper = store.spawn_sweeper(SESSION_SWEEP_INTERVAL);
    let session_layer = create_session_layer(store, state.config());
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(session_layer)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound("page".to_string())
}
