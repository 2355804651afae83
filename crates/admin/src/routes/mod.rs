//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//!
//! # Auth
//! POST /auth/login                   - Login (role must be admin)
//! POST /auth/logout                  - Logout
//!
//! # Products (admin only)
//! GET    /api/products               - Paged list + search
//! POST   /api/products               - Create (400 on validation failure)
//! GET    /api/products/{id}          - Detail (404 body when absent)
//! PATCH  /api/products/{id}          - Partial update
//! DELETE /api/products/{id}          - Delete
//!
//! # Uploads (admin only)
//! POST /api/uploads                  - Multipart image -> public URL
//! GET  /uploads/{file}               - Uploaded images (static)
//!
//! # Delivery fees (admin only)
//! GET    /api/delivery-fees          - List
//! POST   /api/delivery-fees          - Create (409 on duplicate city+state)
//! PATCH  /api/delivery-fees/{id}     - Update
//! DELETE /api/delivery-fees/{id}     - Delete
//! ```

pub mod auth;
pub mod delivery_fees;
pub mod products;
pub mod uploads;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .patch(products::update)
                .delete(products::delete),
        )
}

/// Create the delivery-fee routes router.
pub fn delivery_fee_routes() -> Router<AppState> {
    use axum::routing::patch;

    Router::new()
        .route("/", get(delivery_fees::index).post(delivery_fees::create))
        .route(
            "/{id}",
            patch(delivery_fees::update).delete(delivery_fees::delete),
        )
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/delivery-fees", delivery_fee_routes())
        .route("/api/uploads", post(uploads::create))
}
