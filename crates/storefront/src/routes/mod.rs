//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (DB ping)
//!
//! # Catalog
//! GET  /api/products                    - Product listing (page, search, category)
//! GET  /api/products/{id}               - Product detail + rating summary
//! POST /api/products/{id}/ratings       - Create rating (auth, 409 on duplicate)
//!
//! # Cart (session-backed)
//! GET    /api/cart                      - Cart contents + totals
//! POST   /api/cart/items                - Add item (merges by product)
//! PATCH  /api/cart/items/{product_id}   - Set quantity (<= 0 removes)
//! DELETE /api/cart/items/{product_id}   - Remove line
//! DELETE /api/cart                      - Clear cart
//! GET    /api/cart/count                - Item count badge
//!
//! # Checkout
//! GET  /api/delivery-fees/quote         - Fee resolution for city+state
//! GET  /api/cep/{cep}                   - Postal-code address lookup
//! POST /api/checkout                    - Validate draft, return WhatsApp link
//!
//! # Auth
//! POST /api/auth/register               - Create account + session
//! POST /api/auth/login                  - Login
//! POST /api/auth/logout                 - Logout
//! GET  /api/auth/me                     - Current user
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod ratings;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/ratings", post(ratings::create))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    use axum::routing::patch;

    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{product_id}",
            patch(cart::update).delete(cart::remove),
        )
        .route("/count", get(cart::count))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/auth", auth_routes())
        .route("/api/delivery-fees/quote", get(checkout::quote))
        .route("/api/cep/{cep}", get(checkout::cep_lookup))
        .route("/api/checkout", post(checkout::confirm))
}
