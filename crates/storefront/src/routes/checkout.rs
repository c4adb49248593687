//! Checkout route handlers.
//!
//! Checkout has three steps: the buyer fills in the draft (saved on every
//! change under `checkoutFormData`), continues to payment once every
//! required field is present, and confirms payment. Payment itself is not
//! verified here; confirmation records the order, then clears both the
//! draft and the cart.

use agency_core::{CartItem, CheckoutDraft, DraftPatch, DraftStore, KeyValueStore};
use axum::{Json, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::ApiJson;
use crate::session_storage::{cart_store, draft_store};

/// The checkout draft plus what is still missing.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub draft: CheckoutDraft,
    pub missing_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<S: KeyValueStore> From<&DraftStore<S>> for DraftResponse {
    fn from(store: &DraftStore<S>) -> Self {
        Self {
            draft: store.draft().clone(),
            missing_fields: store
                .draft()
                .missing_fields()
                .into_iter()
                .map(String::from)
                .collect(),
            warning: store
                .persist_warning()
                .map(|e| format!("Your details could not be saved: {e}")),
        }
    }
}

/// What the buyer is about to pay for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub item_count: u64,
    pub has_custom_quote: bool,
    pub buyer: CheckoutDraft,
}

/// Result of a confirmed payment.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub reference: String,
    pub order: OrderSummary,
}

/// `GET /api/checkout/draft`
#[instrument(skip(session))]
pub async fn get_draft(session: Session) -> Json<DraftResponse> {
    let store = draft_store(&session).await;
    Json(DraftResponse::from(&store))
}

/// `PUT /api/checkout/draft` - merge the provided fields.
#[instrument(skip(session, patch))]
pub async fn update_draft(session: Session, ApiJson(patch): ApiJson<DraftPatch>) -> Json<DraftResponse> {
    let mut store = draft_store(&session).await;
    store.update(patch).await;
    Json(DraftResponse::from(&store))
}

/// `DELETE /api/checkout/draft` - the buyer backed out of checkout.
#[instrument(skip(session))]
pub async fn clear_draft(session: Session) -> StatusCode {
    let mut store = draft_store(&session).await;
    store.clear().await;
    StatusCode::NO_CONTENT
}

/// Gate shared by continue and confirm: a non-empty cart and a complete draft.
async fn ready_order(session: &Session) -> Result<OrderSummary> {
    let cart = cart_store(session).await;
    if cart.cart().is_empty() {
        return Err(AppError::EmptyCart);
    }

    let drafts = draft_store(session).await;
    drafts.validate()?;

    Ok(OrderSummary {
        items: cart.items().to_vec(),
        total: cart.total(),
        item_count: cart.cart().item_count(),
        has_custom_quote: cart.has_custom_quote(),
        buyer: drafts.draft().clone(),
    })
}

/// `POST /api/checkout/continue` - move on to the payment step.
///
/// # Errors
///
/// Returns 409 if the cart is empty and 400 listing the blank fields if the
/// draft is incomplete.
#[instrument(skip(session))]
pub async fn continue_to_payment(session: Session) -> Result<Json<OrderSummary>> {
    let order = ready_order(&session).await?;
    add_breadcrumb("checkout", "Continued to payment", None);
    Ok(Json(order))
}

/// `POST /api/checkout/confirm` - record the order and reset checkout.
///
/// # Errors
///
/// Same gating as [`continue_to_payment`].
#[instrument(skip(session))]
pub async fn confirm(session: Session) -> Result<(StatusCode, Json<Confirmation>)> {
    let order = ready_order(&session).await?;
    let reference = Uuid::new_v4().to_string();

    tracing::info!(
        reference = %reference,
        total = %order.total,
        items = order.item_count,
        custom_quote = order.has_custom_quote,
        email = %order.buyer.email,
        "Order confirmed"
    );

    draft_store(&session).await.clear().await;
    cart_store(&session).await.clear().await;

    Ok((StatusCode::CREATED, Json(Confirmation { reference, order })))
}
