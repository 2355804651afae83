//! Product repository: the write side of the catalog.
//!
//! The nutrition/details JSONB columns cross the serialization boundary
//! here, through `sqlx::types::Json`, and nowhere else.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use pampa_core::ProductId;
use pampa_core::catalog::{NutritionFacts, Product, ProductDetails};

use super::RepositoryError;

/// Default page size for admin listings.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Maximum page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Full set of writable product fields.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub promo_price: Option<Decimal>,
    pub stock: i32,
    pub category: Option<String>,
    pub weight: Option<String>,
    pub image_url: Option<String>,
    pub nutrition: Option<NutritionFacts>,
    pub details: Option<ProductDetails>,
}

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

/// Repository for catalog writes.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products with pagination and optional name search.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        page: u32,
        per_page: u32,
        search: Option<&str>,
    ) -> Result<ProductPage, RepositoryError> {
        let per_page = per_page.clamp(1, MAX_PAGE_SIZE);
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);

        let sql = format!(
            "SELECT {SELECT_COLUMNS}
             FROM products
             WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
             ORDER BY updated_at DESC
             LIMIT $2 OFFSET $3"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(search)
            .bind(i64::from(per_page))
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products
             WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')",
        )
        .bind(search)
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

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO products
                 (name, description, price, promo_price, stock, category,
                  weight, image_url, nutrition, details)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {SELECT_COLUMNS}"
        );

        let row: ProductRow = sqlx::query_as(&sql)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.promo_price)
            .bind(input.stock)
            .bind(&input.category)
            .bind(&input.weight)
            .bind(&input.image_url)
            .bind(input.nutrition.clone().map(Json))
            .bind(input.details.clone().map(Json))
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the product does not exist
    /// and `RepositoryError::Database` for other failures.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let sql = format!(
            "UPDATE products SET
                 name = $1, description = $2, price = $3, promo_price = $4,
                 stock = $5, category = $6, weight = $7, image_url = $8,
                 nutrition = $9, details = $10, updated_at = NOW()
             WHERE id = $11
             RETURNING {SELECT_COLUMNS}"
        );

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.promo_price)
            .bind(input.stock)
            .bind(&input.category)
            .bind(&input.weight)
            .bind(&input.image_url)
            .bind(input.nutrition.clone().map(Json))
            .bind(input.details.clone().map(Json))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the product does not exist
    /// and `RepositoryError::Database` for other failures.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
