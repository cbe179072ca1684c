//! Registry user accounts.
//!
//! Credential verification and hashing live with the external
//! credential collaborator; the registry only stores the records it
//! resolves comment authors from. Administrator accounts are seeded by
//! the deployment shell, so the only creation path here is for staff.

use serde::Serialize;
use uuid::Uuid;

use crate::{
    domain::{Email, Name, Role, User},
    error::{EmptyResult, Entity, Error},
    store::Zoo,
};

/// A registry user, as listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetails {
    /// User identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Lowercased email address.
    pub email: String,
    /// The user's role.
    pub role: Role,
}

impl Zoo {
    /// Registers a staff user with a unique email.
    ///
    /// The email is stored trimmed and lowercased; the secret is stored
    /// as supplied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a blank name, a malformed
    /// email, or a blank secret, and [`Error::AlreadyExists`] when the
    /// email is already registered (compared case-insensitively).
    pub fn register_staff(&mut self, name: &str, email: &str, secret: &str) -> Result<Uuid, Error> {
        let name = Name::new(name)?;
        let email = Email::new(email)?;
        if secret.trim().is_empty() {
            return Err(Error::InvalidInput(
                "credential secret must not be blank".to_string(),
            ));
        }
        if self.user_by_email(&email).is_some() {
            return Err(Error::AlreadyExists(Entity::User));
        }

        let user = User::new(name, email, secret.to_string(), Role::Staff);
        let id = user.id();
        tracing::info!("registered staff user {}", user.email());
        self.users.insert(id, user);
        Ok(id)
    }

    /// Lists every registered user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] when no user has been registered.
    pub fn users(&self) -> Result<Vec<UserDetails>, Error> {
        if self.users.is_empty() {
            return Err(Error::EmptyResult(EmptyResult::Users));
        }
        Ok(self
            .users
            .iter()
            .map(|user| UserDetails {
                id: user.id(),
                name: user.name().to_string(),
                email: user.email().to_string(),
                role: user.role(),
            })
            .collect())
    }
}
