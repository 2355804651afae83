//! Delivery-fee resolution policy.
//!
//! Fees are flat per destination (city, state). Pickup orders and orders at
//! or above the free-shipping threshold ship free. A destination with no
//! configured fee is *unavailable* - distinct from a zero fee - and blocks
//! order submission until the customer changes the address or picks pickup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fulfillment {
    /// Customer picks the order up at the shop.
    Pickup,
    /// Order is delivered to the customer's address.
    Delivery,
}

/// Outcome of resolving the delivery fee for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "fee", rename_all = "snake_case")]
pub enum FeeResolution {
    /// No fee: pickup, or the subtotal cleared the free-shipping threshold.
    Free,
    /// The flat fee configured for the destination.
    Flat(Decimal),
    /// No fee configured for the destination; submission is blocked.
    Unavailable,
}

impl FeeResolution {
    /// The chargeable amount, or `None` when unavailable.
    #[must_use]
    pub const fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Free => Some(Decimal::ZERO),
            Self::Flat(fee) => Some(*fee),
            Self::Unavailable => None,
        }
    }
}

/// Default free-shipping threshold: R$ 200,00.
#[must_use]
pub const fn default_free_shipping_threshold() -> Decimal {
    Decimal::from_parts(20000, 0, 0, false, 2)
}

/// Resolve the delivery fee for an order.
///
/// Policy order matters: pickup wins over everything, then the threshold,
/// then the fee table.
#[must_use]
pub fn resolve_fee(
    fulfillment: Fulfillment,
    subtotal: Decimal,
    threshold: Decimal,
    table_fee: Option<Decimal>,
) -> FeeResolution {
    if fulfillment == Fulfillment::Pickup {
        return FeeResolution::Free;
    }

    if subtotal >= threshold {
        return FeeResolution::Free;
    }

    match table_fee {
        Some(fee) => FeeResolution::Flat(fee),
        None => FeeResolution::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_pickup_is_free() {
        let fee = resolve_fee(
            Fulfillment::Pickup,
            dec("10.00"),
            dec("200.00"),
            Some(dec("8.00")),
        );
        assert_eq!(fee, FeeResolution::Free);
        assert_eq!(fee.amount(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_threshold_reached_is_free() {
        let fee = resolve_fee(
            Fulfillment::Delivery,
            dec("200.00"),
            dec("200.00"),
            Some(dec("8.00")),
        );
        assert_eq!(fee, FeeResolution::Free);
    }

    #[test]
    fn test_known_destination_below_threshold_charges_table_fee() {
        let fee = resolve_fee(
            Fulfillment::Delivery,
            dec("55.00"),
            dec("200.00"),
            Some(dec("8.00")),
        );
        assert_eq!(fee, FeeResolution::Flat(dec("8.00")));
        assert_eq!(fee.amount(), Some(dec("8.00")));
    }

    #[test]
    fn test_unknown_destination_is_unavailable_not_zero() {
        let fee = resolve_fee(Fulfillment::Delivery, dec("55.00"), dec("200.00"), None);
        assert_eq!(fee, FeeResolution::Unavailable);
        assert_eq!(fee.amount(), None);
    }

    #[test]
    fn test_default_threshold() {
        assert_eq!(default_free_shipping_threshold(), dec("200.00"));
    }
}
