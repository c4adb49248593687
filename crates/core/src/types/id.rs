//! Service package identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ServiceId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceIdError {
    /// The input is empty or only whitespace.
    #[error("service id cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("service id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Stable identifier of a purchasable service package (e.g. `smm-monthly`).
///
/// The id is the cart's uniqueness key: two line items with the same
/// `ServiceId` are always merged into one.
///
/// ```
/// use agency_core::ServiceId;
///
/// let id = ServiceId::parse("smm-monthly").unwrap();
/// assert_eq!(id.as_str(), "smm-monthly");
///
/// assert!(ServiceId::parse("").is_err());
/// assert!(ServiceId::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceId(String);

impl ServiceId {
    /// Maximum length of a service id.
    pub const MAX_LENGTH: usize = 128;

    /// Parse a `ServiceId`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Self::MAX_LENGTH`].
    pub fn parse(s: &str) -> Result<Self, ServiceIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ServiceIdError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(ServiceIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ServiceId {
    type Err = ServiceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ServiceId {
    type Error = ServiceIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ServiceId> for String {
    fn from(id: ServiceId) -> Self {
        id.0
    }
}

impl AsRef<str> for ServiceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
