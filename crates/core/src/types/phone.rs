//! Brazilian phone number type.
//!
//! Customers type phones in every imaginable shape (`(11) 98765-4321`,
//! `11 98765 4321`, `11987654321`); parsing strips everything but digits and
//! validates the result.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input contains no digits.
    #[error("phone cannot be empty")]
    Empty,
    /// The digit count is not 10 or 11.
    #[error("phone must have 10 or 11 digits (got {got})")]
    WrongLength {
        /// Number of digits found.
        got: usize,
    },
    /// An 11-digit number must be a mobile (third digit is 9).
    #[error("11-digit phone must start with 9 after the area code")]
    NotMobile,
}

/// A normalized Brazilian phone number.
///
/// Stored as bare digits: a two-digit area code followed by an 8-digit
/// landline or a 9-digit mobile number (which must start with 9).
///
/// ## Examples
///
/// ```
/// use pampa_core::Phone;
///
/// assert!(Phone::parse("(11) 98765-4321").is_ok());
/// assert!(Phone::parse("11987654321").is_ok());
/// assert!(Phone::parse("1138654321").is_ok());   // landline
/// assert!(Phone::parse("11287654321").is_err()); // 11 digits, not mobile
/// assert!(Phone::parse("119876543").is_err());   // 9 digits
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from free-form input.
    ///
    /// # Errors
    ///
    /// Returns an error if, after stripping non-digits, the input is empty,
    /// not 10 or 11 digits long, or an 11-digit number whose third digit is
    /// not `9`.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }

        match digits.len() {
            10 => Ok(Self(digits)),
            11 => {
                // Area code is two digits; mobiles carry a leading 9 next.
                if digits.as_bytes().get(2) == Some(&b'9') {
                    Ok(Self(digits))
                } else {
                    Err(PhoneError::NotMobile)
                }
            }
            got => Err(PhoneError::WrongLength { got }),
        }
    }

    /// The normalized digits, without punctuation.
    #[must_use]
    pub fn as_digits(&self) -> &str {
        &self.0
    }

    /// Render as `(AA) NNNNN-NNNN` / `(AA) NNNN-NNNN`.
    #[must_use]
    pub fn display(&self) -> String {
        let (area, rest) = self.0.split_at(2);
        let split = rest.len() - 4;
        let (prefix, suffix) = rest.split_at(split);
        format!("({area}) {prefix}-{suffix}")
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_mobile() {
        let phone = Phone::parse("11987654321").unwrap();
        assert_eq!(phone.as_digits(), "11987654321");
        assert_eq!(phone.display(), "(11) 98765-4321");
    }

    #[test]
    fn test_valid_landline() {
        let phone = Phone::parse("1138654321").unwrap();
        assert_eq!(phone.display(), "(11) 3865-4321");
    }

    #[test]
    fn test_punctuation_stripped() {
        let phone = Phone::parse("(11) 98765-4321").unwrap();
        assert_eq!(phone.as_digits(), "11987654321");
    }

    #[test]
    fn test_eleven_digits_without_mobile_prefix() {
        assert!(matches!(
            Phone::parse("11287654321"),
            Err(PhoneError::NotMobile)
        ));
    }

    #[test]
    fn test_wrong_length() {
        assert!(matches!(
            Phone::parse("119876543"),
            Err(PhoneError::WrongLength { got: 9 })
        ));
        assert!(matches!(
            Phone::parse("119876543210"),
            Err(PhoneError::WrongLength { got: 12 })
        ));
    }

    #[test]
    fn test_empty() {
        assert!(matches!(Phone::parse("abc"), Err(PhoneError::Empty)));
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
    }
}
