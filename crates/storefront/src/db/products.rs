//! Read-only product repository for the public catalog.
//!
//! Queries use runtime-checked `query_as` with `FromRow` rows; the JSONB
//! nutrition/details columns decode through `sqlx::types::Json` here and
//! nowhere else.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use pampa_core::ProductId;
use pampa_core::catalog::{NutritionFacts, Product, ProductDetails};

use super::RepositoryError;

/// Default page size for catalog listings.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A page of products plus the total match count.
#[derive(Debug)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: i64,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    promo_price: Option<Decimal>,
    stock: i32,
    category: Option<String>,
    weight: Option<String>,
    image_url: Option<String>,
    nutrition: Option<Json<NutritionFacts>>,
    details: Option<Json<ProductDetails>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            promo_price: row.promo_price,
            stock: row.stock,
            category: row.category,
            weight: row.weight,
            image_url: row.image_url,
            nutrition: row.nutrition.map(|Json(n)| n),
            details: row.details.map(|Json(d)| d),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = "id, name, description, price, promo_price, stock, \
     category, weight, image_url, nutrition, details, created_at, updated_at";

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products with pagination, optional name search, and optional
    /// category filter. `page` is 1-based.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        page: u32,
        per_page: u32,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<ProductPage, RepositoryError> {
        let per_page = per_page.clamp(1, MAX_PAGE_SIZE);
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);

        let sql = format!(
            "SELECT {SELECT_COLUMNS}
             FROM products
             WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
               AND ($2::text IS NULL OR category = $2)
             ORDER BY name
             LIMIT $3 OFFSET $4"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(search)
            .bind(category)
            .bind(i64::from(per_page))
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM products
             WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
               AND ($2::text IS NULL OR category = $2)",
        )
        .bind(search)
        .bind(category)
        .fetch_one(self.pool)
        .await?;

        Ok(ProductPage {
            products: rows.into_iter().map(Product::from).collect(),
            total,
        })
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM products WHERE id = $1");

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Product::from))
    }
}
