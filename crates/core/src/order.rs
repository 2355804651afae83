//! Order draft validation and WhatsApp handoff.
//!
//! The confirmation flow is a two-step wizard on the client: data entry,
//! then review. The gate between the two - and between review and submit -
//! is [`OrderDraft::validate`], which checks every field against the cart
//! and the resolved delivery fee and either returns a [`ConfirmedOrder`] or
//! the full list of field errors.
//!
//! "Placing" the order means opening a pre-filled WhatsApp chat link; no
//! order record is persisted anywhere. [`ConfirmedOrder::whatsapp_message`]
//! assembles the text and [`ConfirmedOrder::whatsapp_link`] wraps it in a
//! `wa.me` deep link.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::delivery::{FeeResolution, Fulfillment};
use crate::types::{Phone, PostalCode, format_brl};

/// How the customer pays on delivery/pickup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash; `change_for` is the bill the customer will hand over.
    Cash {
        #[serde(default)]
        change_for: Option<Decimal>,
    },
    /// Card on delivery.
    Card,
    /// Pix transfer.
    Pix,
}

/// Delivery address as typed (or auto-filled from the CEP lookup).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub street: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub complement: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// Customer order draft, exactly as submitted by the confirmation dialog.
///
/// Transient: it lives for the duration of one checkout request and is
/// discarded afterwards whether it validates or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_name: String,
    pub phone: String,
    pub fulfillment: Fulfillment,
    #[serde(default)]
    pub address: Option<DeliveryAddress>,
    pub payment: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Draft field the error refers to.
    pub field: &'static str,
    /// Human-readable reason.
    pub message: String,
}

/// Validation failed; all offending fields are listed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("order validation failed ({} field(s))", fields.len())]
pub struct OrderValidationError {
    /// One entry per offending field.
    pub fields: Vec<FieldError>,
}

/// A validated, priced order ready for handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedOrder {
    pub customer_name: String,
    pub phone: Phone,
    pub fulfillment: Fulfillment,
    pub address: Option<ConfirmedAddress>,
    pub payment: PaymentMethod,
    pub notes: Option<String>,
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

/// Address with the postal code validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedAddress {
    pub street: String,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: PostalCode,
}

impl OrderDraft {
    /// Validate the draft against the cart and the resolved delivery fee.
    ///
    /// # Errors
    ///
    /// Returns `OrderValidationError` listing every failing field:
    /// - `customer_name` blank
    /// - `phone` missing or malformed (see [`Phone::parse`])
    /// - `cart` empty
    /// - for delivery: `address` missing, `address.street` blank,
    ///   `address.city`/`address.state` blank, `address.postal_code`
    ///   malformed, or `delivery_fee` unavailable for the destination
    /// - for cash payment: `payment.change_for` missing or below the total
    pub fn validate(
        self,
        cart: &Cart,
        fee: &FeeResolution,
    ) -> Result<ConfirmedOrder, OrderValidationError> {
        let mut fields = Vec::new();

        if self.customer_name.trim().is_empty() {
            fields.push(FieldError {
                field: "customer_name",
                message: "name is required".to_owned(),
            });
        }

        let phone = match Phone::parse(&self.phone) {
            Ok(phone) => Some(phone),
            Err(e) => {
                fields.push(FieldError {
                    field: "phone",
                    message: e.to_string(),
                });
                None
            }
        };

        if cart.is_empty() {
            fields.push(FieldError {
                field: "cart",
                message: "cart is empty".to_owned(),
            });
        }

        let address = match self.fulfillment {
            Fulfillment::Pickup => None,
            Fulfillment::Delivery => validate_address(self.address.as_ref(), &mut fields),
        };

        let delivery_fee = match fee.amount() {
            Some(amount) => amount,
            None => {
                if self.fulfillment == Fulfillment::Delivery {
                    fields.push(FieldError {
                        field: "delivery_fee",
                        message: "delivery is not available for this address".to_owned(),
                    });
                }
                Decimal::ZERO
            }
        };

        let subtotal = cart.subtotal();
        let total = subtotal + delivery_fee;

        if let PaymentMethod::Cash { change_for } = &self.payment {
            match change_for {
                None => fields.push(FieldError {
                    field: "payment.change_for",
                    message: "change amount is required for cash payment".to_owned(),
                }),
                Some(amount) if *amount < total => fields.push(FieldError {
                    field: "payment.change_for",
                    message: format!(
                        "change amount must cover the total of {}",
                        format_brl(total)
                    ),
                }),
                Some(_) => {}
            }
        }

        if !fields.is_empty() {
            return Err(OrderValidationError { fields });
        }

        // `fields` is empty, so phone parsed successfully above.
        let Some(phone) = phone else {
            return Err(OrderValidationError { fields });
        };

        Ok(ConfirmedOrder {
            customer_name: self.customer_name.trim().to_owned(),
            phone,
            fulfillment: self.fulfillment,
            address,
            payment: self.payment,
            notes: self
                .notes
                .map(|n| n.trim().to_owned())
                .filter(|n| !n.is_empty()),
            lines: cart.lines().to_vec(),
            subtotal,
            delivery_fee,
            total,
        })
    }
}

fn validate_address(
    address: Option<&DeliveryAddress>,
    fields: &mut Vec<FieldError>,
) -> Option<ConfirmedAddress> {
    let Some(address) = address else {
        fields.push(FieldError {
            field: "address",
            message: "address is required for delivery".to_owned(),
        });
        return None;
    };

    let mut ok = true;

    if address.street.trim().is_empty() {
        fields.push(FieldError {
            field: "address.street",
            message: "street is required".to_owned(),
        });
        ok = false;
    }

    if address.city.trim().is_empty() {
        fields.push(FieldError {
            field: "address.city",
            message: "city is required".to_owned(),
        });
        ok = false;
    }

    if address.state.trim().is_empty() {
        fields.push(FieldError {
            field: "address.state",
            message: "state is required".to_owned(),
        });
        ok = false;
    }

    let postal_code = match PostalCode::parse(address.postal_code.trim()) {
        Ok(postal_code) => Some(postal_code),
        Err(e) => {
            fields.push(FieldError {
                field: "address.postal_code",
                message: e.to_string(),
            });
            ok = false;
            None
        }
    };

    if !ok {
        return None;
    }

    postal_code.map(|postal_code| ConfirmedAddress {
        street: address.street.trim().to_owned(),
        number: address.number.clone().filter(|s| !s.trim().is_empty()),
        complement: address.complement.clone().filter(|s| !s.trim().is_empty()),
        neighborhood: address
            .neighborhood
            .clone()
            .filter(|s| !s.trim().is_empty()),
        city: address.city.trim().to_owned(),
        state: address.state.trim().to_owned(),
        postal_code,
    })
}

impl ConfirmedOrder {
    /// Assemble the order as the WhatsApp message text.
    #[must_use]
    pub fn whatsapp_message(&self) -> String {
        let mut out = String::from("*Novo pedido — Pampa Congelados*\n\n*Itens:*\n");

        for line in &self.lines {
            out.push_str(&format!(
                "{}x {} — {}\n",
                line.quantity,
                line.name,
                format_brl(line.line_total())
            ));
        }

        out.push_str(&format!("\nSubtotal: {}\n", format_brl(self.subtotal)));

        match self.fulfillment {
            Fulfillment::Pickup => out.push_str("Entrega: retirada na loja\n"),
            Fulfillment::Delivery if self.delivery_fee.is_zero() => {
                out.push_str("Entrega: frete grátis\n");
            }
            Fulfillment::Delivery => {
                out.push_str(&format!("Entrega: {}\n", format_brl(self.delivery_fee)));
            }
        }

        out.push_str(&format!("*Total: {}*\n", format_brl(self.total)));

        out.push_str(&format!("\n*Cliente:* {}\n", self.customer_name));
        out.push_str(&format!("*Telefone:* {}\n", self.phone.display()));

        if let Some(address) = &self.address {
            let mut parts = vec![address.street.clone()];
            if let Some(number) = &address.number {
                parts.push(number.clone());
            }
            if let Some(complement) = &address.complement {
                parts.push(complement.clone());
            }
            if let Some(neighborhood) = &address.neighborhood {
                parts.push(neighborhood.clone());
            }
            parts.push(format!("{}/{}", address.city, address.state));
            out.push_str(&format!(
                "*Endereço:* {} — CEP {}\n",
                parts.join(", "),
                address.postal_code
            ));
        } else {
            out.push_str("*Endereço:* retirada na loja\n");
        }

        match &self.payment {
            PaymentMethod::Cash {
                change_for: Some(change_for),
            } => out.push_str(&format!(
                "*Pagamento:* dinheiro (troco para {})\n",
                format_brl(*change_for)
            )),
            PaymentMethod::Cash { change_for: None } => {
                out.push_str("*Pagamento:* dinheiro\n");
            }
            PaymentMethod::Card => out.push_str("*Pagamento:* cartão\n"),
            PaymentMethod::Pix => out.push_str("*Pagamento:* Pix\n"),
        }

        if let Some(notes) = &self.notes {
            out.push_str(&format!("*Observações:* {notes}\n"));
        }

        out
    }

    /// Build the `wa.me` deep link carrying [`Self::whatsapp_message`].
    ///
    /// `number` may contain punctuation; only its digits are used.
    #[must_use]
    pub fn whatsapp_link(&self, number: &str) -> String {
        let digits: String = number.chars().filter(char::is_ascii_digit).collect();
        format!(
            "https://wa.me/{digits}?text={}",
            urlencoding::encode(&self.whatsapp_message())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartAction;
    use crate::types::{Price, ProductId};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn cart_with(items: &[(i32, &str, &str, u32)]) -> Cart {
        let mut cart = Cart::default();
        for (id, name, price, quantity) in items {
            cart.apply(CartAction::Add {
                line: CartLine {
                    product_id: ProductId::new(*id),
                    name: (*name).to_owned(),
                    unit_price: Price::parse(price).unwrap(),
                    category: None,
                    image_url: None,
                    weight: None,
                    quantity: *quantity,
                },
            });
        }
        cart
    }

    fn pickup_draft() -> OrderDraft {
        OrderDraft {
            customer_name: "Maria Silva".to_owned(),
            phone: "11987654321".to_owned(),
            fulfillment: Fulfillment::Pickup,
            address: None,
            payment: PaymentMethod::Pix,
            notes: None,
        }
    }

    fn delivery_draft() -> OrderDraft {
        OrderDraft {
            customer_name: "Maria Silva".to_owned(),
            phone: "11987654321".to_owned(),
            fulfillment: Fulfillment::Delivery,
            address: Some(DeliveryAddress {
                street: "Av. Paulista".to_owned(),
                number: Some("1000".to_owned()),
                complement: None,
                neighborhood: Some("Bela Vista".to_owned()),
                city: "São Paulo".to_owned(),
                state: "SP".to_owned(),
                postal_code: "01310-100".to_owned(),
            }),
            payment: PaymentMethod::Card,
            notes: None,
        }
    }

    fn fields_of(err: &OrderValidationError) -> Vec<&'static str> {
        err.fields.iter().map(|f| f.field).collect()
    }

    #[test]
    fn test_pickup_total_is_subtotal() {
        let cart = cart_with(&[(1, "Pão de Queijo", "10.00", 3), (2, "Lasanha", "25.00", 1)]);
        let order = pickup_draft().validate(&cart, &FeeResolution::Free).unwrap();

        assert_eq!(order.subtotal, dec("55.00"));
        assert_eq!(order.delivery_fee, Decimal::ZERO);
        assert_eq!(order.total, dec("55.00"));
    }

    #[test]
    fn test_delivery_total_adds_flat_fee() {
        let cart = cart_with(&[(1, "Pão de Queijo", "10.00", 3), (2, "Lasanha", "25.00", 1)]);
        let order = delivery_draft()
            .validate(&cart, &FeeResolution::Flat(dec("8.00")))
            .unwrap();

        assert_eq!(order.subtotal, dec("55.00"));
        assert_eq!(order.delivery_fee, dec("8.00"));
        assert_eq!(order.total, dec("63.00"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let cart = cart_with(&[(1, "A", "1.00", 1)]);
        let mut draft = pickup_draft();
        draft.customer_name = "   ".to_owned();

        let err = draft.validate(&cart, &FeeResolution::Free).unwrap_err();
        assert!(fields_of(&err).contains(&"customer_name"));
    }

    #[test]
    fn test_bad_phone_rejected() {
        let cart = cart_with(&[(1, "A", "1.00", 1)]);
        let mut draft = pickup_draft();
        draft.phone = "11287654321".to_owned();

        let err = draft.validate(&cart, &FeeResolution::Free).unwrap_err();
        assert!(fields_of(&err).contains(&"phone"));
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = pickup_draft()
            .validate(&Cart::default(), &FeeResolution::Free)
            .unwrap_err();
        assert!(fields_of(&err).contains(&"cart"));
    }

    #[test]
    fn test_delivery_requires_address_and_postal_code() {
        let cart = cart_with(&[(1, "A", "1.00", 1)]);
        let mut draft = delivery_draft();
        draft.address = None;

        let err = draft
            .validate(&cart, &FeeResolution::Flat(dec("8.00")))
            .unwrap_err();
        assert!(fields_of(&err).contains(&"address"));
    }

    #[test]
    fn test_delivery_rejects_bad_postal_code() {
        let cart = cart_with(&[(1, "A", "1.00", 1)]);
        let mut draft = delivery_draft();
        if let Some(address) = draft.address.as_mut() {
            address.postal_code = "01310100".to_owned();
        }

        let err = draft
            .validate(&cart, &FeeResolution::Flat(dec("8.00")))
            .unwrap_err();
        assert!(fields_of(&err).contains(&"address.postal_code"));
    }

    #[test]
    fn test_unavailable_fee_blocks_delivery_but_not_pickup() {
        let cart = cart_with(&[(1, "A", "1.00", 1)]);

        let err = delivery_draft()
            .validate(&cart, &FeeResolution::Unavailable)
            .unwrap_err();
        assert!(fields_of(&err).contains(&"delivery_fee"));

        assert!(pickup_draft().validate(&cart, &FeeResolution::Free).is_ok());
    }

    #[test]
    fn test_cash_requires_change_covering_total() {
        let cart = cart_with(&[(1, "A", "55.00", 1)]);

        let mut draft = pickup_draft();
        draft.payment = PaymentMethod::Cash { change_for: None };
        let err = draft.validate(&cart, &FeeResolution::Free).unwrap_err();
        assert!(fields_of(&err).contains(&"payment.change_for"));

        let mut draft = pickup_draft();
        draft.payment = PaymentMethod::Cash {
            change_for: Some(dec("50.00")),
        };
        let err = draft.validate(&cart, &FeeResolution::Free).unwrap_err();
        assert!(fields_of(&err).contains(&"payment.change_for"));

        let mut draft = pickup_draft();
        draft.payment = PaymentMethod::Cash {
            change_for: Some(dec("60.00")),
        };
        assert!(draft.validate(&cart, &FeeResolution::Free).is_ok());
    }

    #[test]
    fn test_whatsapp_message_contents() {
        let cart = cart_with(&[(1, "Pão de Queijo", "10.00", 3), (2, "Lasanha", "25.00", 1)]);
        let order = delivery_draft()
            .validate(&cart, &FeeResolution::Flat(dec("8.00")))
            .unwrap();

        let message = order.whatsapp_message();
        assert!(message.contains("3x Pão de Queijo — R$ 30,00"));
        assert!(message.contains("1x Lasanha — R$ 25,00"));
        assert!(message.contains("Subtotal: R$ 55,00"));
        assert!(message.contains("Entrega: R$ 8,00"));
        assert!(message.contains("*Total: R$ 63,00*"));
        assert!(message.contains("(11) 98765-4321"));
        assert!(message.contains("CEP 01310-100"));
    }

    #[test]
    fn test_whatsapp_link_is_encoded() {
        let cart = cart_with(&[(1, "A", "1.00", 1)]);
        let order = pickup_draft().validate(&cart, &FeeResolution::Free).unwrap();

        let link = order.whatsapp_link("+55 (11) 91234-5678");
        assert!(link.starts_with("https://wa.me/5511912345678?text="));
        assert!(!link.contains(' '));
        assert!(!link.contains('\n'));
    }
}
