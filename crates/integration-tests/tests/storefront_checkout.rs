//! Integration tests for delivery-fee quoting and the checkout handoff.
//!
//! Requirements are the same as the cart tests; the delivery-fee cases also
//! expect the seeded fee table (Porto Alegre/RS at R$ 8,00).
//!
//! Run with: cargo test -p pampa-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use pampa_integration_tests::{session_client, storefront_base_url};

async fn add_first_product(client: &reqwest::Client, quantity: u32) {
    let base_url = storefront_base_url();
    let body: Value = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Failed to parse product list");
    let product_id = body["products"][0]["id"]
        .as_i64()
        .expect("Catalog is empty; run the seed command first");

    let resp = client
        .post(format!("{base_url}/api/cart/items"))
        .json(&json!({ "product_id": product_id, "quantity": quantity }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_quote_known_destination() {
    let client = session_client();
    let base_url = storefront_base_url();
    add_first_product(&client, 1).await;

    let body: Value = client
        .get(format!(
            "{base_url}/api/delivery-fees/quote?city=Porto%20Alegre&state=RS"
        ))
        .send()
        .await
        .expect("Failed to quote")
        .json()
        .await
        .expect("Failed to parse quote");

    // Seeded subtotal is below the threshold, so the flat fee applies.
    assert_eq!(body["status"], "flat");
    assert_eq!(body["fee"], "8.00");
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_quote_unknown_destination_is_unavailable() {
    let client = session_client();
    let base_url = storefront_base_url();
    add_first_product(&client, 1).await;

    let body: Value = client
        .get(format!(
            "{base_url}/api/delivery-fees/quote?city=Manaus&state=AM"
        ))
        .send()
        .await
        .expect("Failed to quote")
        .json()
        .await
        .expect("Failed to parse quote");

    // Unknown destination: unavailable, not a zero fee.
    assert_eq!(body["status"], "unavailable");
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_checkout_validation_failure_is_422() {
    let client = session_client();
    let base_url = storefront_base_url();
    add_first_product(&client, 1).await;

    let resp = client
        .post(format!("{base_url}/api/checkout"))
        .json(&json!({
            "customer_name": "",
            "phone": "119876543",
            "fulfillment": "pickup",
            "payment": { "method": "pix" }
        }))
        .send()
        .await
        .expect("Failed to call checkout");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .expect("field errors missing")
        .iter()
        .filter_map(|f| f["field"].as_str())
        .collect();
    assert!(fields.contains(&"customer_name"));
    assert!(fields.contains(&"phone"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_pickup_checkout_returns_handoff_and_clears_cart() {
    let client = session_client();
    let base_url = storefront_base_url();
    add_first_product(&client, 2).await;

    let resp = client
        .post(format!("{base_url}/api/checkout"))
        .json(&json!({
            "customer_name": "Maria Silva",
            "phone": "11987654321",
            "fulfillment": "pickup",
            "payment": { "method": "pix" },
            "notes": "sem cebola"
        }))
        .send()
        .await
        .expect("Failed to call checkout");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse checkout");
    let link = body["whatsapp_link"].as_str().expect("link missing");
    assert!(link.starts_with("https://wa.me/"));
    assert!(body["message"].as_str().expect("message missing").contains("Maria Silva"));

    // The handoff clears the cart.
    let cart: Value = client
        .get(format!("{base_url}/api/cart"))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(cart["item_count"], 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_duplicate_rating_is_conflict() {
    let client = session_client();
    let base_url = storefront_base_url();

    // Register a fresh user so the first rating succeeds.
    let email = format!("cliente-{}@pampa.test", uuid::Uuid::new_v4());
    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "email": email,
            "password": "correta cavalo bateria",
            "name": "Cliente Teste"
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let products: Value = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Failed to parse product list");
    let product_id = products["products"][0]["id"].as_i64().expect("empty catalog");

    let rate = || {
        client
            .post(format!("{base_url}/api/products/{product_id}/ratings"))
            .json(&json!({ "stars": 5, "comment": "excelente" }))
            .send()
    };

    let first = rate().await.expect("Failed to rate");
    assert_eq!(first.status(), StatusCode::CREATED);

    // Same user + product again: conflict class, not a generic 500.
    let second = rate().await.expect("Failed to rate twice");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}
