//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Errors shared by the CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Password hashing error")]
    PasswordHash,

    #[error("{0}")]
    Invalid(String),
}

/// Resolve the database URL from the environment.
///
/// Accepts `DATABASE_URL` or either binary-specific variable - all three
/// point at the same shared database.
pub fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    for key in ["DATABASE_URL", "STOREFRONT_DATABASE_URL", "ADMIN_DATABASE_URL"] {
        if let Ok(value) = std::env::var(key) {
            return Ok(SecretString::from(value));
        }
    }
    Err(CommandError::MissingEnvVar("DATABASE_URL"))
}

/// Connect with a small pool; CLI commands are short-lived.
pub async fn connect(url: &SecretString) -> Result<PgPool, CommandError> {
    use secrecy::ExposeSecret;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(url.expose_secret())
        .await?;
    Ok(pool)
}
