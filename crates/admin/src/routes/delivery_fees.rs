//! Delivery-fee CRUD route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use pampa_core::DeliveryFeeId;
use pampa_core::catalog::DeliveryFee;

use crate::db::RepositoryError;
use crate::db::delivery_fees::DeliveryFeeRepository;
use crate::error::{AdminError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Fee creation/update body.
#[derive(Debug, Deserialize)]
pub struct FeeBody {
    pub city: String,
    pub state: String,
    pub fee: Decimal,
}

fn validate_body(body: &FeeBody) -> Result<()> {
    let mut violations = Vec::new();

    if body.city.trim().is_empty() {
        violations.push("city is required");
    }
    if body.state.trim().len() != 2 {
        violations.push("state must be a two-letter code");
    }
    if body.fee < Decimal::ZERO {
        violations.push("fee cannot be negative");
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(AdminError::BadRequest(violations.join("; ")))
    }
}

/// List all configured fees.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<DeliveryFee>>> {
    let fees = DeliveryFeeRepository::new(state.pool()).list().await?;
    Ok(Json(fees))
}

/// Create a fee entry. A duplicate (city, state) pair answers 409.
#[instrument(skip(admin, state, body))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(body): Json<FeeBody>,
) -> Result<(StatusCode, Json<DeliveryFee>)> {
    validate_body(&body)?;

    let fee = DeliveryFeeRepository::new(state.pool())
        .create(&body.city, &body.state, body.fee)
        .await?;

    tracing::info!(fee_id = %fee.id, admin_id = %admin.id, "delivery fee created");

    Ok((StatusCode::CREATED, Json(fee)))
}

/// Update a fee entry.
#[instrument(skip(admin, state, body))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<FeeBody>,
) -> Result<Json<DeliveryFee>> {
    validate_body(&body)?;

    let id = DeliveryFeeId::new(id);
    let fee = DeliveryFeeRepository::new(state.pool())
        .update(id, &body.city, &body.state, body.fee)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::NotFound(format!("delivery fee {id}")),
            other => AdminError::Database(other),
        })?;

    Ok(Json(fee))
}

/// Delete a fee entry.
#[instrument(skip(admin, state))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let id = DeliveryFeeId::new(id);

    DeliveryFeeRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::NotFound(format!("delivery fee {id}")),
            other => AdminError::Database(other),
        })?;

    tracing::info!(fee_id = %id, admin_id = %admin.id, "delivery fee deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_body() {
        let body = FeeBody {
            city: "Porto Alegre".to_owned(),
            state: "RS".to_owned(),
            fee: "8.00".parse().unwrap(),
        };
        assert!(validate_body(&body).is_ok());

        let body = FeeBody {
            city: " ".to_owned(),
            state: "RSX".to_owned(),
            fee: "-1".parse().unwrap(),
        };
        assert!(validate_body(&body).is_err());
    }
}
