//! Catalog seeding command.
//!
//! Inserts a handful of demo products and delivery fees so a fresh
//! environment has something to browse. Skips seeding when the catalog
//! already has products.

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::info;

use pampa_core::catalog::{NutritionFacts, ProductDetails};

use super::{CommandError, connect, database_url};

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: &'static str,
    promo_price: Option<&'static str>,
    stock: i32,
    category: &'static str,
    weight: &'static str,
    nutrition: NutritionFacts,
    details: ProductDetails,
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap_or(Decimal::ZERO)
}

fn seed_products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Pão de Queijo",
            description: "Pão de queijo mineiro congelado, pronto para assar.",
            price: "18.90",
            promo_price: None,
            stock: 40,
            category: "Salgados",
            weight: "1kg",
            nutrition: NutritionFacts {
                serving_size: Some("100g".to_owned()),
                calories_kcal: Some(dec("300")),
                carbohydrates_g: Some(dec("34")),
                protein_g: Some(dec("5.5")),
                total_fat_g: Some(dec("15")),
                ..NutritionFacts::default()
            },
            details: ProductDetails {
                ingredients: vec![
                    "polvilho".to_owned(),
                    "queijo minas".to_owned(),
                    "ovos".to_owned(),
                    "leite".to_owned(),
                ],
                storage: Some("Manter congelado a -18°C".to_owned()),
                shelf_life: Some("90 dias".to_owned()),
                preparation: Some("Forno pré-aquecido a 180°C por 25 minutos".to_owned()),
            },
        },
        SeedProduct {
            name: "Lasanha Bolonhesa",
            description: "Lasanha artesanal de carne com molho bolonhesa.",
            price: "32.00",
            promo_price: Some("27.90"),
            stock: 25,
            category: "Massas",
            weight: "800g",
            nutrition: NutritionFacts {
                serving_size: Some("250g".to_owned()),
                calories_kcal: Some(dec("380")),
                carbohydrates_g: Some(dec("40")),
                protein_g: Some(dec("22")),
                total_fat_g: Some(dec("14")),
                ..NutritionFacts::default()
            },
            details: ProductDetails {
                ingredients: vec![
                    "massa fresca".to_owned(),
                    "carne bovina".to_owned(),
                    "molho de tomate".to_owned(),
                    "queijo muçarela".to_owned(),
                ],
                storage: Some("Manter congelado a -18°C".to_owned()),
                shelf_life: Some("120 dias".to_owned()),
                preparation: Some("Forno a 200°C por 40 minutos".to_owned()),
            },
        },
        SeedProduct {
            name: "Escondidinho de Carne Seca",
            description: "Purê de mandioca com recheio de carne seca desfiada.",
            price: "28.50",
            promo_price: None,
            stock: 18,
            category: "Pratos Prontos",
            weight: "600g",
            nutrition: NutritionFacts::default(),
            details: ProductDetails {
                ingredients: vec![
                    "mandioca".to_owned(),
                    "carne seca".to_owned(),
                    "manteiga de garrafa".to_owned(),
                ],
                storage: Some("Manter congelado a -18°C".to_owned()),
                shelf_life: Some("120 dias".to_owned()),
                preparation: None,
            },
        },
    ]
}

const SEED_FEES: &[(&str, &str, &str)] = &[
    ("Porto Alegre", "RS", "8.00"),
    ("Canoas", "RS", "12.00"),
    ("Gravataí", "RS", "15.00"),
];

/// Seed demo catalog data.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let url = database_url()?;
    let pool = connect(&url).await?;

    seed_catalog(&pool).await
}

async fn seed_catalog(pool: &PgPool) -> Result<(), CommandError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        info!(existing, "Catalog already has products; skipping product seed");
    } else {
        for product in seed_products() {
            sqlx::query(
                "INSERT INTO products
                     (name, description, price, promo_price, stock, category,
                      weight, nutrition, details)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(product.name)
            .bind(product.description)
            .bind(dec(product.price))
            .bind(product.promo_price.map(dec))
            .bind(product.stock)
            .bind(product.category)
            .bind(product.weight)
            .bind(Json(product.nutrition))
            .bind(Json(product.details))
            .execute(pool)
            .await?;
        }
        info!(count = seed_products().len(), "Products seeded");
    }

    for (city, state, fee) in SEED_FEES {
        sqlx::query(
            "INSERT INTO delivery_fees (city, state, fee)
             VALUES ($1, $2, $3)
             ON CONFLICT (city, state) DO NOTHING",
        )
        .bind(city)
        .bind(state)
        .bind(dec(fee))
        .execute(pool)
        .await?;
    }
    info!(count = SEED_FEES.len(), "Delivery fees ensured");

    Ok(())
}
