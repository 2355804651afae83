//! Cart route handlers.
//!
//! The cart lives in the session under a single key as one serialized blob.
//! Every mutation goes through the reducer in `pampa_core::cart`, gets
//! persisted back to the session, and the response carries the resulting
//! [`CartChange`] so the client can show the "added/removed/quantity
//! changed" notification.
//!
//! Prices are server-authoritative: adding an item loads the product from
//! the catalog and snapshots its current (promo-aware) price into the line.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use pampa_core::cart::{Cart, CartAction, CartChange, CartLine};
use pampa_core::{Price, ProductId, format_brl};

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session.
///
/// A missing or corrupt blob yields an empty cart; malformed persisted state
/// is discarded rather than surfaced as an error.
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the cart back to the session.
async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session
        .insert(session_keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(format!("failed to persist cart: {e}")))
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddItemBody {
    pub product_id: i32,
    pub quantity: Option<u32>,
}

/// Set-quantity request body. Zero or negative removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateItemBody {
    pub quantity: i32,
}

/// Cart line as rendered in responses.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub unit_price_display: String,
    pub quantity: u32,
    pub line_total: Decimal,
    pub line_total_display: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub weight: Option<String>,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        let line_total = line.line_total();
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            unit_price: line.unit_price.amount(),
            unit_price_display: line.unit_price.display(),
            quantity: line.quantity,
            line_total,
            line_total_display: format_brl(line_total),
            category: line.category.clone(),
            image_url: line.image_url.clone(),
            weight: line.weight.clone(),
        }
    }
}

/// Cart contents plus recomputed totals.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLineView>,
    pub subtotal: Decimal,
    pub subtotal_display: String,
    pub item_count: u32,
}

impl CartResponse {
    fn from_cart(cart: &Cart) -> Self {
        let subtotal = cart.subtotal();
        Self {
            items: cart.lines().iter().map(CartLineView::from).collect(),
            subtotal,
            subtotal_display: format_brl(subtotal),
            item_count: cart.item_count(),
        }
    }
}

/// Mutation response: what changed, and the cart afterwards.
#[derive(Debug, Serialize)]
pub struct CartMutationResponse {
    pub change: CartChange,
    #[serde(flatten)]
    pub cart: CartResponse,
}

/// Cart count badge response.
#[derive(Debug, Serialize)]
pub struct CartCountResponse {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Current cart contents.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartResponse> {
    let cart = load_cart(&session).await;
    Json(CartResponse::from_cart(&cart))
}

/// Add an item to the cart, merging quantities for an existing product.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddItemBody>,
) -> Result<(StatusCode, Json<CartMutationResponse>)> {
    let quantity = body.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".into()));
    }

    let product_id = ProductId::new(body.product_id);
    let product = ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let unit_price = Price::from_decimal(product.effective_price())
        .map_err(|e| AppError::Internal(format!("bad catalog price: {e}")))?;

    let mut cart = load_cart(&session).await;
    let change = cart.apply(CartAction::Add {
        line: CartLine {
            product_id: product.id,
            name: product.name,
            unit_price,
            category: product.category,
            image_url: product.image_url,
            weight: product.weight,
            quantity,
        },
    });
    save_cart(&session, &cart).await?;

    tracing::debug!(product_id = %product_id, quantity, "item added to cart");

    Ok((
        StatusCode::CREATED,
        Json(CartMutationResponse {
            change,
            cart: CartResponse::from_cart(&cart),
        }),
    ))
}

/// Set a line's quantity. Zero or negative removes it.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Path(product_id): Path<i32>,
    Json(body): Json<UpdateItemBody>,
) -> Result<Json<CartMutationResponse>> {
    let mut cart = load_cart(&session).await;
    let change = cart.apply(CartAction::SetQuantity {
        product_id: ProductId::new(product_id),
        quantity: body.quantity,
    });

    if matches!(change, CartChange::Noop) {
        return Err(AppError::NotFound(format!("cart line {product_id}")));
    }

    save_cart(&session, &cart).await?;

    Ok(Json(CartMutationResponse {
        change,
        cart: CartResponse::from_cart(&cart),
    }))
}

/// Remove a line unconditionally.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Path(product_id): Path<i32>,
) -> Result<Json<CartMutationResponse>> {
    let mut cart = load_cart(&session).await;
    let change = cart.apply(CartAction::Remove {
        product_id: ProductId::new(product_id),
    });

    if matches!(change, CartChange::Noop) {
        return Err(AppError::NotFound(format!("cart line {product_id}")));
    }

    save_cart(&session, &cart).await?;

    Ok(Json(CartMutationResponse {
        change,
        cart: CartResponse::from_cart(&cart),
    }))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartMutationResponse>> {
    let mut cart = load_cart(&session).await;
    let change = cart.apply(CartAction::Clear);
    save_cart(&session, &cart).await?;

    Ok(Json(CartMutationResponse {
        change,
        cart: CartResponse::from_cart(&cart),
    }))
}

/// Item count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCountResponse> {
    let cart = load_cart(&session).await;
    Json(CartCountResponse {
        count: cart.item_count(),
    })
}
