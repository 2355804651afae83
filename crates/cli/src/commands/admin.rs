//! Admin user management command.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use tracing::info;

use super::{CommandError, connect, database_url};

/// Minimum admin password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Create an admin user, or promote/rehash an existing account.
///
/// # Errors
///
/// Returns an error if the password is too short, the database is
/// unreachable, or the upsert fails.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(CommandError::Invalid(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if !email.contains('@') {
        return Err(CommandError::Invalid(format!("invalid email: {email}")));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| CommandError::PasswordHash)?
        .to_string();

    let url = database_url()?;
    let pool = connect(&url).await?;

    sqlx::query(
        "INSERT INTO users (email, password_hash, name, role)
         VALUES ($1, $2, $3, 'admin')
         ON CONFLICT (email)
         DO UPDATE SET password_hash = $2, name = $3, role = 'admin', updated_at = NOW()",
    )
    .bind(email.to_lowercase())
    .bind(&password_hash)
    .bind(name)
    .execute(&pool)
    .await?;

    info!(email, "Admin user ready");
    Ok(())
}
