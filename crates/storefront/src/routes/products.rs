//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pampa_core::ProductId;
use pampa_core::catalog::Product;
use pampa_core::format_brl;

use crate::db::products::{DEFAULT_PAGE_SIZE, ProductRepository};
use crate::db::ratings::{RatingRepository, RatingSummary};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Pagination and filter query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Product as rendered in API responses, with display prices attached.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    /// What the customer pays (promo wins when present).
    pub effective_price: String,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let effective_price = format_brl(product.effective_price());
        Self {
            product,
            effective_price,
        }
    }
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductView>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Product detail response.
#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    #[serde(flatten)]
    pub product: ProductView,
    pub ratings: RatingSummary,
}

/// List products with pagination, search, and category filter.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE);

    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let repo = ProductRepository::new(state.pool());
    let result = repo.list(page, per_page, search, category).await?;

    Ok(Json(ProductListResponse {
        products: result.products.into_iter().map(ProductView::from).collect(),
        page,
        per_page,
        total: result.total,
    }))
}

/// Product detail with rating summary. Missing products get a dedicated
/// not-found body, not a generic error.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductDetailResponse>> {
    let id = ProductId::new(id);

    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let ratings = RatingRepository::new(state.pool())
        .summary_for_product(id)
        .await?;

    Ok(Json(ProductDetailResponse {
        product: ProductView::from(product),
        ratings,
    }))
}
