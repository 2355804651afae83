//! Delivery-fee repository: CRUD over the flat-fee table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use pampa_core::DeliveryFeeId;
use pampa_core::catalog::DeliveryFee;

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct DeliveryFeeRow {
    id: i32,
    city: String,
    state: String,
    fee: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DeliveryFeeRow> for DeliveryFee {
    fn from(row: DeliveryFeeRow) -> Self {
        Self {
            id: DeliveryFeeId::new(row.id),
            city: row.city,
            state: row.state,
            fee: row.fee,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn map_unique_violation(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("a fee for this city and state already exists".to_owned());
    }
    RepositoryError::Database(e)
}

/// Repository for delivery-fee writes.
pub struct DeliveryFeeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DeliveryFeeRepository<'a> {
    /// Create a new delivery-fee repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all configured fees, ordered by state then city.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<DeliveryFee>, RepositoryError> {
        let rows: Vec<DeliveryFeeRow> = sqlx::query_as(
            "SELECT id, city, state, fee, created_at, updated_at
             FROM delivery_fees ORDER BY state, city",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(DeliveryFee::from).collect())
    }

    /// Create a fee entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when a fee for the (city, state)
    /// pair already exists and `RepositoryError::Database` otherwise.
    pub async fn create(
        &self,
        city: &str,
        state: &str,
        fee: Decimal,
    ) -> Result<DeliveryFee, RepositoryError> {
        let row: DeliveryFeeRow = sqlx::query_as(
            "INSERT INTO delivery_fees (city, state, fee)
             VALUES ($1, $2, $3)
             RETURNING id, city, state, fee, created_at, updated_at",
        )
        .bind(city.trim())
        .bind(state.trim().to_uppercase())
        .bind(fee)
        .fetch_one(self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(row.into())
    }

    /// Update a fee entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the entry does not exist,
    /// `RepositoryError::Conflict` when the new (city, state) pair collides
    /// with another entry, and `RepositoryError::Database` otherwise.
    pub async fn update(
        &self,
        id: DeliveryFeeId,
        city: &str,
        state: &str,
        fee: Decimal,
    ) -> Result<DeliveryFee, RepositoryError> {
        let row: Option<DeliveryFeeRow> = sqlx::query_as(
            "UPDATE delivery_fees
             SET city = $1, state = $2, fee = $3, updated_at = NOW()
             WHERE id = $4
             RETURNING id, city, state, fee, created_at, updated_at",
        )
        .bind(city.trim())
        .bind(state.trim().to_uppercase())
        .bind(fee)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await
        .map_err(map_unique_violation)?;

        row.map(DeliveryFee::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a fee entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the entry does not exist
    /// and `RepositoryError::Database` for other failures.
    pub async fn delete(&self, id: DeliveryFeeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM delivery_fees WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
