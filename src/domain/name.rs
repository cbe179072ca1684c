use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A trimmed, non-empty display name.
///
/// Names keep the casing they were entered with, but every uniqueness
/// check and lookup in the registry compares them case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(NonEmptyString);

impl Name {
    /// Trims and validates a raw name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the trimmed input is empty.
    pub fn new(raw: &str) -> Result<Self, Error> {
        let trimmed = raw.trim();
        NonEmptyString::new(trimmed.to_string())
            .map(Self)
            .map_err(|_| Error::InvalidInput("name must not be blank".to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Case-insensitive comparison against a raw lookup key.
    ///
    /// The key is trimmed before comparison, mirroring how names are
    /// normalized on the way in.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        self.as_str().to_lowercase() == key.trim().to_lowercase()
    }
}

impl Deref for Name {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Name {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.0.to_string()
    }
}

/// A trimmed, lowercased email address.
///
/// Emails are normalized to lowercase on construction, so equality on
/// `Email` is already the case-insensitive comparison the uniqueness
/// rule calls for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(NonEmptyString);

impl Email {
    /// Normalizes and validates a raw email address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the trimmed input is empty or
    /// is missing an `@`.
    pub fn new(raw: &str) -> Result<Self, Error> {
        let normalized = raw.trim().to_lowercase();
        if !normalized.contains('@') {
            return Err(Error::InvalidInput(format!(
                "'{normalized}' is not a valid email address"
            )));
        }
        NonEmptyString::new(normalized)
            .map(Self)
            .map_err(|_| Error::InvalidInput("email must not be blank".to_string()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Email {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Email {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        let name = Name::new("  Savanna  ").unwrap();
        assert_eq!(name.as_str(), "Savanna");
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(matches!(Name::new("   "), Err(Error::InvalidInput(_))));
        assert!(matches!(Name::new(""), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn matching_ignores_case_and_padding() {
        let name = Name::new("Savanna").unwrap();
        assert!(name.matches("savanna"));
        assert!(name.matches("  SAVANNA "));
        assert!(!name.matches("savann"));
    }

    #[test]
    fn email_is_lowercased() {
        let email = Email::new(" Keeper@Zoo.Org ").unwrap();
        assert_eq!(email.as_str(), "keeper@zoo.org");
    }

    #[test]
    fn email_without_at_is_rejected() {
        assert!(matches!(Email::new("keeper.zoo.org"), Err(Error::InvalidInput(_))));
    }
}
