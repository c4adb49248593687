//! Cart route handlers.
//!
//! The cart lives in the visitor's session under the `cart` key and is
//! written through after every operation. Two surfaces share the same
//! store:
//!
//! - HTML forms on the cart and services pages (`/cart/*`), which redirect
//!   back to `/cart`;
//! - a JSON API (`/api/cart/*`) returning a [`CartSummary`].

use agency_core::{
    CartItem, CartStore, ItemPatch, KeyValueStore, NewCartItem, ServiceId, catalog, format_amount,
};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    response::{IntoResponse, Redirect},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::{ApiForm, ApiJson, ApiPath};
use crate::session_storage::cart_store;

// =============================================================================
// Views
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub custom_quote: bool,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
    pub has_custom_quote: bool,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        let custom_quote = item.needs_quote();
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            description: item.description.clone(),
            quantity: item.quantity,
            price: if custom_quote && item.price.is_custom_quote() {
                "Custom quote".to_string()
            } else {
                item.price.to_string()
            },
            line_price: format_amount(item.line_total()),
            custom_quote,
        }
    }
}

impl<S: KeyValueStore> From<&CartStore<S>> for CartView {
    fn from(store: &CartStore<S>) -> Self {
        let cart = store.cart();
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: format_amount(cart.total()),
            item_count: cart.item_count(),
            has_custom_quote: cart.has_custom_quote(),
        }
    }
}

/// JSON view of the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub item_count: u64,
    pub has_custom_quote: bool,
    /// Set when the last write did not reach storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<S: KeyValueStore> From<&CartStore<S>> for CartSummary {
    fn from(store: &CartStore<S>) -> Self {
        let cart = store.cart();
        Self {
            items: cart.items().to_vec(),
            total: cart.total(),
            item_count: cart.item_count(),
            has_custom_quote: cart.has_custom_quote(),
            warning: store
                .persist_warning()
                .map(|e| format!("Your cart could not be saved: {e}")),
        }
    }
}

/// Parse a service id from a path or form field.
fn parse_id(raw: &str) -> Result<ServiceId> {
    ServiceId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

// =============================================================================
// HTML
// =============================================================================

/// Add-to-cart form data (services page).
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub service_id: String,
    pub quantity: Option<u32>,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: i64,
}

/// Remove line form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let store = cart_store(&session).await;
    CartShowTemplate {
        cart: CartView::from(&store),
    }
}

/// Add a catalog package to the cart.
///
/// # Errors
///
/// Returns 404 if the package does not exist.
#[instrument(skip(session))]
pub async fn add(session: Session, ApiForm(form): ApiForm<AddToCartForm>) -> Result<Redirect> {
    let package = catalog::find(form.service_id.trim())
        .ok_or_else(|| AppError::NotFound(form.service_id.clone()))?;
    let mut item = package
        .to_cart_item()
        .ok_or_else(|| AppError::Internal(format!("malformed package id {}", package.id)))?;
    item.quantity = form.quantity;

    let mut store = cart_store(&session).await;
    store.add_item(item).await;
    add_breadcrumb("cart", "Added package", Some(&[("service_id", package.id)][..]));

    Ok(Redirect::to("/cart"))
}

/// Update a line's quantity from the cart page.
///
/// # Errors
///
/// Returns 400 if the id is blank.
#[instrument(skip(session))]
pub async fn update(session: Session, ApiForm(form): ApiForm<UpdateCartForm>) -> Result<Redirect> {
    let id = parse_id(&form.id)?;
    let mut store = cart_store(&session).await;
    store.set_quantity(&id, form.quantity).await;
    Ok(Redirect::to("/cart"))
}

/// Remove a line from the cart page.
///
/// # Errors
///
/// Returns 400 if the id is blank.
#[instrument(skip(session))]
pub async fn remove(session: Session, ApiForm(form): ApiForm<RemoveFromCartForm>) -> Result<Redirect> {
    let id = parse_id(&form.id)?;
    let mut store = cart_store(&session).await;
    store.remove_item(&id).await;
    Ok(Redirect::to("/cart"))
}

// =============================================================================
// JSON API
// =============================================================================

/// Body of `PUT /api/cart/items/{id}/quantity`.
#[derive(Debug, Deserialize)]
pub struct QuantityBody {
    pub quantity: i64,
}

/// `GET /api/cart`
#[instrument(skip(session))]
pub async fn summary(session: Session) -> Json<CartSummary> {
    let store = cart_store(&session).await;
    Json(CartSummary::from(&store))
}

/// `POST /api/cart/items` - add a line or increase its quantity.
#[instrument(skip(session), fields(id = %item.id))]
pub async fn add_item(session: Session, ApiJson(item): ApiJson<NewCartItem>) -> Json<CartSummary> {
    let mut store = cart_store(&session).await;
    store.add_item(item).await;
    Json(CartSummary::from(&store))
}

/// `PATCH /api/cart/items/{id}` - merge annotation fields.
///
/// # Errors
///
/// Returns 400 if the id is blank.
#[instrument(skip(session, patch))]
pub async fn patch_item(
    session: Session,
    ApiPath(id): ApiPath<String>,
    ApiJson(patch): ApiJson<ItemPatch>,
) -> Result<Json<CartSummary>> {
    let id = parse_id(&id)?;
    let mut store = cart_store(&session).await;
    store.patch_item(&id, patch).await;
    Ok(Json(CartSummary::from(&store)))
}

/// `PUT /api/cart/items/{id}/quantity` - replace the quantity; `<= 0` removes.
///
/// # Errors
///
/// Returns 400 if the id is blank.
#[instrument(skip(session))]
pub async fn set_quantity(
    session: Session,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<QuantityBody>,
) -> Result<Json<CartSummary>> {
    let id = parse_id(&id)?;
    let mut store = cart_store(&session).await;
    store.set_quantity(&id, body.quantity).await;
    Ok(Json(CartSummary::from(&store)))
}

/// `DELETE /api/cart/items/{id}` - remove a line; absent ids are a no-op.
///
/// # Errors
///
/// Returns 400 if the id is blank.
#[instrument(skip(session))]
pub async fn remove_item(session: Session, ApiPath(id): ApiPath<String>) -> Result<Json<CartSummary>> {
    let id = parse_id(&id)?;
    let mut store = cart_store(&session).await;
    store.remove_item(&id).await;
    Ok(Json(CartSummary::from(&store)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use agency_core::{MemoryStore, Price};

    use super::*;

    #[tokio::test]
    async fn test_view_marks_custom_quote() {
        let mut store = CartStore::open(MemoryStore::new()).await;
        store
            .add_item(NewCartItem::new(
                ServiceId::parse("custom-project").unwrap(),
                "Custom Project",
                Price::ZERO,
            ))
            .await;
        store
            .add_item(
                NewCartItem::new(
                    ServiceId::parse("logo-design").unwrap(),
                    "Logo Design",
                    Price::from_units(3_499),
                )
                .with_quantity(2),
            )
            .await;

        let view = CartView::from(&store);
        assert!(view.has_custom_quote);
        assert_eq!(view.subtotal, "₹6998.00");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.items[0].price, "Custom quote");
        assert_eq!(view.items[1].line_price, "₹6998.00");
    }

    #[tokio::test]
    async fn test_summary_surfaces_persist_warning() {
        let mut store = CartStore::open(MemoryStore::with_quota(1)).await;
        store
            .add_item(NewCartItem::new(
                ServiceId::parse("a").unwrap(),
                "X",
                Price::from_units(100),
            ))
            .await;

        let summary = CartSummary::from(&store);
        assert_eq!(summary.items.len(), 1);
        assert!(summary.warning.unwrap().contains("quota"));
    }
}
