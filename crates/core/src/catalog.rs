//! Catalog entities shared by the storefront and admin binaries.
//!
//! The original product sheets carried nutrition and detail attributes as
//! opaque JSON text; here they are typed structures, and (de)serialization
//! happens exactly once, at the repository boundary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{DeliveryFeeId, ProductId, RatingId, UserId};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Regular price.
    pub price: Decimal,
    /// Promotional price; when set, this is what the customer pays.
    pub promo_price: Option<Decimal>,
    pub stock: i32,
    pub category: Option<String>,
    /// Package weight label (e.g. "500g").
    pub weight: Option<String>,
    pub image_url: Option<String>,
    pub nutrition: Option<NutritionFacts>,
    pub details: Option<ProductDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The price the customer actually pays (promo wins when present).
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.promo_price.unwrap_or(self.price)
    }
}

/// Nutrition facts per serving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionFacts {
    #[serde(default)]
    pub serving_size: Option<String>,
    #[serde(default)]
    pub calories_kcal: Option<Decimal>,
    #[serde(default)]
    pub carbohydrates_g: Option<Decimal>,
    #[serde(default)]
    pub protein_g: Option<Decimal>,
    #[serde(default)]
    pub total_fat_g: Option<Decimal>,
    #[serde(default)]
    pub saturated_fat_g: Option<Decimal>,
    #[serde(default)]
    pub fiber_g: Option<Decimal>,
    #[serde(default)]
    pub sodium_mg: Option<Decimal>,
}

/// Free-form product detail attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub shelf_life: Option<String>,
    #[serde(default)]
    pub preparation: Option<String>,
}

/// A flat delivery fee for one (city, state) destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryFee {
    pub id: DeliveryFeeId,
    pub city: String,
    pub state: String,
    pub fee: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product rating left by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: RatingId,
    pub product_id: ProductId,
    pub user_id: UserId,
    /// 1 to 5 stars.
    pub stars: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(price: &str, promo: Option<&str>) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Pão de Queijo".to_owned(),
            description: String::new(),
            price: dec(price),
            promo_price: promo.map(dec),
            stock: 10,
            category: Some("Salgados".to_owned()),
            weight: Some("500g".to_owned()),
            image_url: None,
            nutrition: None,
            details: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_effective_price_prefers_promo() {
        assert_eq!(product("12.00", Some("9.90")).effective_price(), dec("9.90"));
        assert_eq!(product("12.00", None).effective_price(), dec("12.00"));
    }

    #[test]
    fn test_nutrition_roundtrips_as_json() {
        let nutrition = NutritionFacts {
            serving_size: Some("100g".to_owned()),
            calories_kcal: Some(dec("250")),
            ..NutritionFacts::default()
        };
        let json = serde_json::to_value(&nutrition).unwrap();
        let back: NutritionFacts = serde_json::from_value(json).unwrap();
        assert_eq!(back, nutrition);
    }

    #[test]
    fn test_details_tolerate_missing_fields() {
        let details: ProductDetails = serde_json::from_str("{}").unwrap();
        assert!(details.ingredients.is_empty());
        assert!(details.storage.is_none());
    }
}
