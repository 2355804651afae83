//! Admin auth route handlers.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::users::UserRepository;
use crate::error::{AdminError, Result};
use crate::middleware::auth::{CurrentAdmin, clear_current_admin, set_current_admin};
use crate::state::AppState;

/// Login body.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Log in to the admin panel.
///
/// Credentials are checked against the shared users table; the account must
/// carry the admin role, otherwise the response is 403 even with a correct
/// password.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<Json<CurrentAdmin>> {
    let (account, password_hash) = UserRepository::new(state.pool())
        .get_auth_by_email(body.email.trim().to_lowercase().as_str())
        .await?
        .ok_or_else(|| AdminError::Unauthorized("invalid credentials".to_owned()))?;

    let parsed_hash = PasswordHash::new(&password_hash)
        .map_err(|_| AdminError::Unauthorized("invalid credentials".to_owned()))?;
    Argon2::default()
        .verify_password(body.password.as_bytes(), &parsed_hash)
        .map_err(|_| AdminError::Unauthorized("invalid credentials".to_owned()))?;

    if !account.role.is_admin() {
        return Err(AdminError::Forbidden("admin access required".to_owned()));
    }

    let admin = CurrentAdmin {
        id: account.id,
        email: account.email,
        name: account.name,
        role: account.role,
    };

    set_current_admin(&session, &admin)
        .await
        .map_err(|e| AdminError::Internal(format!("failed to start session: {e}")))?;

    tracing::info!(admin_id = %admin.id, "admin logged in");

    Ok(Json(admin))
}

/// Log out the current admin.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AdminError::Internal(format!("failed to end session: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}
