//! Integration tests for the admin catalog CRUD.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The admin server running (cargo run -p pampa-admin)
//! - An admin account matching `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD`
//!
//! Run with: cargo test -p pampa-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use pampa_integration_tests::{admin_base_url, session_client};

/// Log in and return a client carrying the admin session cookie.
async fn admin_client() -> Client {
    let client = session_client();
    let base_url = admin_base_url();

    let email =
        std::env::var("TEST_ADMIN_EMAIL").unwrap_or_else(|_| "admin@pampa.test".to_string());
    let password =
        std::env::var("TEST_ADMIN_PASSWORD").expect("TEST_ADMIN_PASSWORD must be set");

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK, "admin login failed");

    client
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_routes_require_auth() {
    let client = session_client();
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to call products");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_product_crud_lifecycle() {
    let client = admin_client().await;
    let base_url = admin_base_url();

    // Create
    let resp = client
        .post(format!("{base_url}/api/products"))
        .json(&json!({
            "name": "Coxinha de Frango",
            "description": "Coxinha congelada, caixa com 12 unidades.",
            "price": "24.90",
            "stock": 30,
            "category": "Salgados",
            "weight": "900g",
            "nutrition": { "serving_size": "75g", "calories_kcal": "210" },
            "details": { "ingredients": ["frango", "farinha de trigo"] }
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.expect("Failed to parse product");
    let id = created["id"].as_i64().expect("id missing");

    // Patch: change stock, clear nothing else.
    let resp = client
        .patch(format!("{base_url}/api/products/{id}"))
        .json(&json!({ "stock": 12, "promo_price": "19.90" }))
        .send()
        .await
        .expect("Failed to patch product");
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(patched["stock"], 12);
    assert_eq!(patched["name"], "Coxinha de Frango");

    // Delete
    let resp = client
        .delete(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Gone: dedicated not-found state.
    let resp = client
        .get(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_product_validation_rejected_with_400() {
    let client = admin_client().await;
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/api/products"))
        .json(&json!({
            "name": "",
            "price": "0",
            "stock": -5
        }))
        .send()
        .await
        .expect("Failed to call create");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    let message = body["error"].as_str().unwrap_or_default();
    assert!(message.contains("name is required"));
    assert!(message.contains("price"));
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_duplicate_delivery_fee_is_conflict() {
    let client = admin_client().await;
    let base_url = admin_base_url();
    let city = format!("Cidade-{}", uuid::Uuid::new_v4());

    let create = |fee: &'static str| {
        client
            .post(format!("{base_url}/api/delivery-fees"))
            .json(&json!({ "city": city, "state": "RS", "fee": fee }))
            .send()
    };

    let first = create("10.00").await.expect("Failed to create fee");
    assert_eq!(first.status(), StatusCode::CREATED);
    let created: Value = first.json().await.expect("Failed to parse fee");

    // Same (city, state) again: conflict with a specific message.
    let second = create("12.00").await.expect("Failed to create fee twice");
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = second.json().await.expect("Failed to parse error");
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("already exists")
    );

    // Cleanup
    let id = created["id"].as_i64().expect("id missing");
    let _ = client
        .delete(format!("{base_url}/api/delivery-fees/{id}"))
        .send()
        .await;
}
