//! Integration tests for Pampa Congelados.
//!
//! # Running Tests
//!
//! ```bash
//! # Run migrations and seed demo data
//! cargo run -p pampa-cli -- migrate
//! cargo run -p pampa-cli -- seed
//! cargo run -p pampa-cli -- admin create -e admin@pampa.test -n Admin -p <password>
//!
//! # Start both servers
//! cargo run -p pampa-storefront
//! cargo run -p pampa-admin
//!
//! # Run the tests (they are #[ignore]d by default)
//! cargo test -p pampa-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `STOREFRONT_BASE_URL` (default: <http://localhost:3000>)
//! - `ADMIN_BASE_URL` (default: <http://localhost:3001>)
//! - `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD` for admin login

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Create an HTTP client that keeps session cookies.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn session_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
