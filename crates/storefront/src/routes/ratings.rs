//! Rating route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use pampa_core::ProductId;
use pampa_core::catalog::Rating;

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::db::ratings::RatingRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Rating creation body.
#[derive(Debug, Deserialize)]
pub struct CreateRatingBody {
    pub stars: i16,
    pub comment: Option<String>,
}

/// Create a rating for a product.
///
/// One rating per (user, product): a second attempt returns 409 with a
/// message distinct from generic failure.
#[instrument(skip(state, user, body))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<i32>,
    Json(body): Json<CreateRatingBody>,
) -> Result<(StatusCode, Json<Rating>)> {
    if !(1..=5).contains(&body.stars) {
        return Err(AppError::BadRequest(
            "stars must be between 1 and 5".to_owned(),
        ));
    }

    let product_id = ProductId::new(product_id);
    let exists = ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .is_some();
    if !exists {
        return Err(AppError::NotFound(format!("product {product_id}")));
    }

    let comment = body
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let rating = RatingRepository::new(state.pool())
        .create(product_id, user.id, body.stars, comment)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                AppError::Conflict("you have already rated this product".to_owned())
            }
            other => AppError::Database(other),
        })?;

    Ok((StatusCode::CREATED, Json(rating)))
}
