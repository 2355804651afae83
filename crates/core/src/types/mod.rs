//! Newtype wrappers for domain values.
//!
//! Each type validates on construction so the rest of the codebase can trust
//! that a `Phone` or `PostalCode` is well-formed without re-checking.

mod email;
mod id;
mod phone;
mod postal_code;
mod price;
mod role;

pub use email::{Email, EmailError};
pub use id::{DeliveryFeeId, ProductId, RatingId, UserId};
pub use phone::{Phone, PhoneError};
pub use postal_code::{PostalCode, PostalCodeError};
pub use price::{Price, PriceError, format_brl};
pub use role::UserRole;
