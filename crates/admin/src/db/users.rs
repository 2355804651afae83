//! Admin-side access to the shared users table.
//!
//! Only what the admin login needs: credentials plus the role that gates
//! the panel.

use sqlx::PgPool;

use pampa_core::{Email, UserId, UserRole};

use super::RepositoryError;

/// Minimal account data the admin panel works with.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: UserRole,
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i32,
    email: String,
    name: String,
    role: UserRole,
    password_hash: String,
}

/// Repository for admin account lookups.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an account and its password hash by email, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails and
    /// `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_auth_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(AdminAccount, String)>, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(
            "SELECT id, email, name, role, password_hash
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => {
                let email = Email::parse(&r.email).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
                })?;
                Ok(Some((
                    AdminAccount {
                        id: UserId::new(r.id),
                        email,
                        name: r.name,
                        role: r.role,
                    },
                    r.password_hash,
                )))
            }
            None => Ok(None),
        }
    }
}
