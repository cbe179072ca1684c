use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{Email, Name},
    error::{Entity, Error},
};

/// Access role for registry users. The set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access.
    Administrator,
    /// Day-to-day keeper access.
    Staff,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Administrator => f.write_str("administrator"),
            Self::Staff => f.write_str("staff"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "administrator" => Ok(Self::Administrator),
            "staff" => Ok(Self::Staff),
            _ => Err(Error::NotFound(Entity::Role)),
        }
    }
}

/// A registry user.
///
/// The credential secret is stored as supplied; hashing and verification
/// belong to the external credential collaborator, never to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub(crate) id: Uuid,
    pub(crate) name: Name,
    /// Unique, lowercased email address.
    pub(crate) email: Email,
    pub(crate) secret: String,
    pub(crate) role: Role,
}

impl User {
    pub(crate) fn new(name: Name, email: Email, secret: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            secret,
            role,
        }
    }

    /// The user's opaque identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The user's display name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// The user's email address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// The user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

/// A caller identity resolved by the external credential collaborator.
///
/// The registry never parses tokens. Front doors resolve the caller once
/// per request and thread the result through explicitly, which also
/// keeps comment authoring trivially testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The verified email of the caller.
    pub email: Email,
    /// The caller's role.
    pub role: Role,
}

impl Identity {
    /// Convenience constructor for front doors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the email is malformed.
    pub fn resolved(email: &str, role: Role) -> Result<Self, Error> {
        Ok(Self {
            email: Email::new(email)?,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Staff".parse::<Role>().unwrap(), Role::Staff);
        assert_eq!(
            " ADMINISTRATOR ".parse::<Role>().unwrap(),
            Role::Administrator
        );
        assert_eq!(
            "keeper".parse::<Role>().unwrap_err(),
            Error::NotFound(Entity::Role)
        );
    }
}
