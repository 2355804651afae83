//! Checkout route handlers: fee quoting, CEP lookup, and order confirmation.
//!
//! Confirming an order does not create any server-side record. The draft is
//! validated against the session cart and the resolved delivery fee; on
//! success the response carries the WhatsApp deep link (the order handoff)
//! and the cart is cleared.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use pampa_core::delivery::{FeeResolution, Fulfillment, resolve_fee};
use pampa_core::order::OrderDraft;
use pampa_core::{PostalCode, format_brl};

use crate::db::delivery_fees::DeliveryFeeRepository;
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::routes::cart::load_cart;
use crate::services::cep::CepAddress;
use crate::state::AppState;

/// Query parameters for a delivery-fee quote.
#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub city: String,
    pub state: String,
}

/// Delivery-fee quote for the current cart and a destination.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub resolution: FeeResolution,
    pub subtotal: Decimal,
    pub free_shipping_threshold: Decimal,
}

/// Successful checkout: the order handoff.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub whatsapp_link: String,
    pub message: String,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub total_display: String,
}

/// Resolve the delivery fee for the session cart and a destination.
///
/// Unknown destinations resolve to `unavailable` - distinct from a zero fee.
#[instrument(skip(state, session))]
pub async fn quote(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<QuoteResponse>> {
    let cart = load_cart(&session).await;
    let subtotal = cart.subtotal();
    let threshold = state.config().free_shipping_threshold;

    let table_fee = DeliveryFeeRepository::new(state.pool())
        .find_fee(&query.city, &query.state)
        .await?;

    let resolution = resolve_fee(Fulfillment::Delivery, subtotal, threshold, table_fee);

    Ok(Json(QuoteResponse {
        resolution,
        subtotal,
        free_shipping_threshold: threshold,
    }))
}

/// Look up an address from a CEP.
///
/// Best-effort: failures here degrade to manual address entry on the client
/// and never block checkout by themselves.
#[instrument(skip(state))]
pub async fn cep_lookup(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<CepAddress>> {
    let cep = PostalCode::parse(cep.trim()).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let address = state.cep().lookup(&cep).await?;
    Ok(Json(address))
}

/// Validate the order draft and hand it off to WhatsApp.
///
/// On success the cart is cleared; the caller opens the returned link in a
/// new context. Validation failures return 422 with per-field errors and
/// leave the cart untouched.
#[instrument(skip(state, session, draft))]
pub async fn confirm(
    State(state): State<AppState>,
    session: Session,
    Json(draft): Json<OrderDraft>,
) -> Result<Json<CheckoutResponse>> {
    let cart = load_cart(&session).await;
    let threshold = state.config().free_shipping_threshold;

    // Resolve the fee from the draft's destination. Pickup short-circuits to
    // free; a delivery draft without a usable destination resolves to
    // unavailable and fails validation below.
    let table_fee = match (&draft.fulfillment, &draft.address) {
        (Fulfillment::Delivery, Some(address)) => {
            DeliveryFeeRepository::new(state.pool())
                .find_fee(&address.city, &address.state)
                .await?
        }
        _ => None,
    };
    let fee = resolve_fee(draft.fulfillment, cart.subtotal(), threshold, table_fee);

    let order = draft.validate(&cart, &fee)?;
    let link = order.whatsapp_link(&state.config().whatsapp_number);

    // The handoff is the submission: clear the cart and reset.
    session
        .remove::<pampa_core::cart::Cart>(session_keys::CART)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear cart: {e}")))?;

    tracing::info!(
        total = %order.total,
        items = order.lines.len(),
        fulfillment = ?order.fulfillment,
        "order handed off"
    );

    Ok(Json(CheckoutResponse {
        whatsapp_link: link,
        message: order.whatsapp_message(),
        subtotal: order.subtotal,
        delivery_fee: order.delivery_fee,
        total: order.total,
        total_display: format_brl(order.total),
    }))
}
