//! User account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pampa_core::{Email, UserId, UserRole};

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
