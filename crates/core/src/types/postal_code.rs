//! Brazilian postal code (CEP) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PostalCodeError {
    /// The input string is empty.
    #[error("postal code cannot be empty")]
    Empty,
    /// The input does not match the `#####-###` pattern.
    #[error("postal code must match the 00000-000 format")]
    BadFormat,
}

/// A Brazilian postal code in the canonical `#####-###` form.
///
/// The format check is strict: the hyphen is required and must sit after the
/// fifth digit. Auto-formatting sloppy input is the client's job; by the
/// time a CEP reaches the server it is either canonical or rejected.
///
/// ## Examples
///
/// ```
/// use pampa_core::PostalCode;
///
/// assert!(PostalCode::parse("01310-100").is_ok());
/// assert!(PostalCode::parse("01310100").is_err());
/// assert!(PostalCode::parse("0131-100").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Parse a `PostalCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or does not match `#####-###`.
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        if s.is_empty() {
            return Err(PostalCodeError::Empty);
        }

        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 9
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| if i == 5 { *b == b'-' } else { b.is_ascii_digit() });

        if well_formed {
            Ok(Self(s.to_owned()))
        } else {
            Err(PostalCodeError::BadFormat)
        }
    }

    /// The canonical `#####-###` form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The eight bare digits, hyphen removed (the form lookup services use).
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.replace('-', "")
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = PostalCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid() {
        let cep = PostalCode::parse("01310-100").unwrap();
        assert_eq!(cep.as_str(), "01310-100");
        assert_eq!(cep.digits(), "01310100");
    }

    #[test]
    fn test_missing_hyphen() {
        assert!(matches!(
            PostalCode::parse("01310100"),
            Err(PostalCodeError::BadFormat)
        ));
    }

    #[test]
    fn test_hyphen_misplaced() {
        assert!(matches!(
            PostalCode::parse("0131-100"),
            Err(PostalCodeError::BadFormat)
        ));
    }

    #[test]
    fn test_non_digits() {
        assert!(matches!(
            PostalCode::parse("0131a-100"),
            Err(PostalCodeError::BadFormat)
        ));
    }

    #[test]
    fn test_empty() {
        assert!(matches!(PostalCode::parse(""), Err(PostalCodeError::Empty)));
    }
}
