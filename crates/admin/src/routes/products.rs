//! Product CRUD route handlers.
//!
//! Create and update validate the payload server-side and answer 400 with
//! every violated rule; the client enforces the same rules in its form
//! schema, so anything that arrives broken here is either a bug or a bypass.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tracing::instrument;

use pampa_core::ProductId;
use pampa_core::catalog::{NutritionFacts, Product, ProductDetails};

use crate::db::RepositoryError;
use crate::db::products::{DEFAULT_PAGE_SIZE, ProductInput, ProductPage, ProductRepository};
use crate::error::{AdminError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Maximum accepted product name length.
const MAX_NAME_LENGTH: usize = 200;

/// Maximum accepted description length.
const MAX_DESCRIPTION_LENGTH: usize = 5000;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
}

/// Product listing response.
#[derive(Debug, serde::Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Create-product body: the full writable field set.
#[derive(Debug, Deserialize)]
pub struct CreateProductBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub promo_price: Option<Decimal>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub nutrition: Option<NutritionFacts>,
    #[serde(default)]
    pub details: Option<ProductDetails>,
}

/// Patch body: absent fields keep their value; nullable fields are cleared
/// by sending an explicit `null`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub promo_price: Option<Option<Decimal>>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub weight: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub nutrition: Option<Option<NutritionFacts>>,
    #[serde(default, deserialize_with = "double_option")]
    pub details: Option<Option<ProductDetails>>,
}

/// Distinguishes an absent field (keep) from an explicit `null` (clear).
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl From<CreateProductBody> for ProductInput {
    fn from(body: CreateProductBody) -> Self {
        Self {
            name: body.name.trim().to_owned(),
            description: body.description.trim().to_owned(),
            price: body.price,
            promo_price: body.promo_price,
            stock: body.stock,
            category: body.category.filter(|s| !s.trim().is_empty()),
            weight: body.weight.filter(|s| !s.trim().is_empty()),
            image_url: body.image_url.filter(|s| !s.trim().is_empty()),
            nutrition: body.nutrition,
            details: body.details,
        }
    }
}

/// Validate a full product payload. Returns every violated rule.
fn validate_input(input: &ProductInput) -> Vec<String> {
    let mut violations = Vec::new();

    if input.name.is_empty() {
        violations.push("name is required".to_owned());
    } else if input.name.len() > MAX_NAME_LENGTH {
        violations.push(format!("name must be at most {MAX_NAME_LENGTH} characters"));
    }

    if input.description.len() > MAX_DESCRIPTION_LENGTH {
        violations.push(format!(
            "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        ));
    }

    if input.price <= Decimal::ZERO {
        violations.push("price must be greater than zero".to_owned());
    }

    if let Some(promo) = input.promo_price {
        if promo <= Decimal::ZERO {
            violations.push("promo price must be greater than zero".to_owned());
        } else if promo >= input.price {
            violations.push("promo price must be below the regular price".to_owned());
        }
    }

    if input.stock < 0 {
        violations.push("stock cannot be negative".to_owned());
    }

    violations
}

fn ensure_valid(input: &ProductInput) -> Result<()> {
    let violations = validate_input(input);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AdminError::BadRequest(violations.join("; ")))
    }
}

/// Merge a patch body into an existing product's field set.
fn merge_patch(existing: Product, patch: UpdateProductBody) -> ProductInput {
    ProductInput {
        name: patch
            .name
            .map_or(existing.name, |name| name.trim().to_owned()),
        description: patch
            .description
            .map_or(existing.description, |d| d.trim().to_owned()),
        price: patch.price.unwrap_or(existing.price),
        promo_price: patch.promo_price.unwrap_or(existing.promo_price),
        stock: patch.stock.unwrap_or(existing.stock),
        category: patch.category.unwrap_or(existing.category),
        weight: patch.weight.unwrap_or(existing.weight),
        image_url: patch.image_url.unwrap_or(existing.image_url),
        nutrition: patch.nutrition.unwrap_or(existing.nutrition),
        details: patch.details.unwrap_or(existing.details),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List products with pagination and search.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE);
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let ProductPage { products, total } = ProductRepository::new(state.pool())
        .list(page, per_page, search)
        .await?;

    Ok(Json(ProductListResponse {
        products,
        page,
        per_page,
        total,
    }))
}

/// Product detail.
#[instrument(skip(admin, state))]
pub async fn show(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("product {id}")))?;

    Ok(Json(product))
}

/// Create a product.
#[instrument(skip(admin, state, body))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateProductBody>,
) -> Result<(StatusCode, Json<Product>)> {
    let input = ProductInput::from(body);
    ensure_valid(&input)?;

    let product = ProductRepository::new(state.pool()).create(&input).await?;

    tracing::info!(product_id = %product.id, admin_id = %admin.id, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// Partially update a product.
#[instrument(skip(admin, state, body))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateProductBody>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    let repo = ProductRepository::new(state.pool());

    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("product {id}")))?;

    let input = merge_patch(existing, body);
    ensure_valid(&input)?;

    let product = repo.update(id, &input).await.map_err(|e| match e {
        RepositoryError::NotFound => AdminError::NotFound(format!("product {id}")),
        other => AdminError::Database(other),
    })?;

    tracing::info!(product_id = %product.id, admin_id = %admin.id, "product updated");

    Ok(Json(product))
}

/// Delete a product.
#[instrument(skip(admin, state))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let id = ProductId::new(id);

    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::NotFound(format!("product {id}")),
            other => AdminError::Database(other),
        })?;

    tracing::info!(product_id = %id, admin_id = %admin.id, "product deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn valid_input() -> ProductInput {
        ProductInput {
            name: "Pão de Queijo".to_owned(),
            description: "Tradicional".to_owned(),
            price: dec("10.00"),
            promo_price: None,
            stock: 5,
            category: Some("Salgados".to_owned()),
            weight: Some("500g".to_owned()),
            image_url: None,
            nutrition: None,
            details: None,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate_input(&valid_input()).is_empty());
    }

    #[test]
    fn test_name_required() {
        let mut input = valid_input();
        input.name = String::new();
        let violations = validate_input(&input);
        assert!(violations.iter().any(|v| v.contains("name is required")));
    }

    #[test]
    fn test_price_must_be_positive() {
        let mut input = valid_input();
        input.price = Decimal::ZERO;
        assert!(!validate_input(&input).is_empty());
    }

    #[test]
    fn test_promo_must_undercut_price() {
        let mut input = valid_input();
        input.promo_price = Some(dec("12.00"));
        assert!(!validate_input(&input).is_empty());

        input.promo_price = Some(dec("8.00"));
        assert!(validate_input(&input).is_empty());
    }

    #[test]
    fn test_negative_stock_rejected() {
        let mut input = valid_input();
        input.stock = -1;
        assert!(!validate_input(&input).is_empty());
    }

    #[test]
    fn test_patch_merge_keeps_absent_and_clears_null() {
        let existing = Product {
            id: ProductId::new(1),
            name: "Lasanha".to_owned(),
            description: "Bolonhesa".to_owned(),
            price: dec("25.00"),
            promo_price: Some(dec("19.90")),
            stock: 3,
            category: Some("Massas".to_owned()),
            weight: None,
            image_url: None,
            nutrition: None,
            details: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        // Absent fields keep their values; explicit null clears promo_price.
        let patch: UpdateProductBody =
            serde_json::from_str(r#"{"stock": 10, "promo_price": null}"#).unwrap();
        let merged = merge_patch(existing, patch);

        assert_eq!(merged.name, "Lasanha");
        assert_eq!(merged.stock, 10);
        assert_eq!(merged.promo_price, None);
        assert_eq!(merged.category.as_deref(), Some("Massas"));
    }
}
