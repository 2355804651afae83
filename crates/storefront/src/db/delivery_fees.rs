//! Delivery-fee lookups for checkout.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;

/// Repository for delivery-fee reads.
pub struct DeliveryFeeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DeliveryFeeRepository<'a> {
    /// Create a new delivery-fee repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up the flat fee for a destination. Matching is case-insensitive
    /// on both city and state; `None` means the destination has no
    /// configured fee (delivery unavailable, not free).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_fee(
        &self,
        city: &str,
        state: &str,
    ) -> Result<Option<Decimal>, RepositoryError> {
        let fee: Option<Decimal> = sqlx::query_scalar(
            "SELECT fee FROM delivery_fees
             WHERE lower(city) = lower($1) AND lower(state) = lower($2)",
        )
        .bind(city.trim())
        .bind(state.trim())
        .fetch_optional(self.pool)
        .await?;

        Ok(fee)
    }
}
