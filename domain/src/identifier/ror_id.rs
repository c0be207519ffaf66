//! ROR identifier value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of characters in a ROR identifier
pub const ROR_ID_LEN: usize = 9;

/// Prefix of the canonical registry URL for an identifier
pub const ROR_URL_PREFIX: &str = "https://ror.org/";

/// A ROR identifier (Value Object)
///
/// Always exactly nine characters from `[0-9a-z]`. Input is lowercased
/// before validation, so `03VEK6S52` and `03vek6s52` are the same ID.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RorId(String);

impl RorId {
    /// Parse and normalize an identifier
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.to_ascii_lowercase();
        if Self::is_valid(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(DomainError::InvalidIdentifier(raw.to_string()))
        }
    }

    /// Whether `s` is already a well-formed lowercase identifier
    pub fn is_valid(s: &str) -> bool {
        s.len() == ROR_ID_LEN
            && s
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical registry URL, e.g. `https://ror.org/03vek6s52`
    pub fn url(&self) -> String {
        format!("{}{}", ROR_URL_PREFIX, self.0)
    }
}

impl fmt::Display for RorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RorId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RorId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RorId> for String {
    fn from(id: RorId) -> Self {
        id.0
    }
}

impl AsRef<str> for RorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
