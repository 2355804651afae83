//! Rating repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use pampa_core::catalog::Rating;
use pampa_core::{ProductId, RatingId, UserId};

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct RatingRow {
    id: i32,
    product_id: i32,
    user_id: i32,
    stars: i16,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Self {
            id: RatingId::new(row.id),
            product_id: ProductId::new(row.product_id),
            user_id: UserId::new(row.user_id),
            stars: row.stars,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

/// Aggregate rating figures for a product.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct RatingSummary {
    /// Number of ratings.
    pub count: i64,
    /// Mean stars, `None` when the product has no ratings.
    pub average: Option<f64>,
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    count: i64,
    average: Option<f64>,
}

/// Repository for product ratings.
pub struct RatingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RatingRepository<'a> {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a rating.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the user has already rated
    /// the product (unique constraint) and `RepositoryError::Database` for
    /// other database errors.
    pub async fn create(
        &self,
        product_id: ProductId,
        user_id: UserId,
        stars: i16,
        comment: Option<&str>,
    ) -> Result<Rating, RepositoryError> {
        let row: RatingRow = sqlx::query_as(
            "INSERT INTO ratings (product_id, user_id, stars, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING id, product_id, user_id, stars, comment, created_at",
        )
        .bind(product_id.as_i32())
        .bind(user_id.as_i32())
        .bind(stars)
        .bind(comment)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("rating already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Aggregate count and average for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<RatingSummary, RepositoryError> {
        let row: SummaryRow = sqlx::query_as(
            "SELECT COUNT(*) AS count, AVG(stars)::float8 AS average
             FROM ratings WHERE product_id = $1",
        )
        .bind(product_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(RatingSummary {
            count: row.count,
            average: row.average,
        })
    }
}
