//! The error taxonomy shared by every registry operation.
//!
//! Failures are raised synchronously at the point of detection and abort
//! the whole operation; no partial writes are left behind. Front doors
//! are expected to surface these kinds unchanged.

use std::fmt;

use chrono::NaiveDate;

/// The record families an error can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A habitat zone.
    Zone,
    /// A species within a zone.
    Species,
    /// An individual animal.
    Animal,
    /// A comment on an animal's wall.
    Comment,
    /// The parent of a reply.
    ParentComment,
    /// A registry user.
    User,
    /// A user role.
    Role,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Zone => "zone",
            Self::Species => "species",
            Self::Animal => "animal",
            Self::Comment => "comment",
            Self::ParentComment => "parent comment",
            Self::User => "user",
            Self::Role => "role",
        };
        f.write_str(label)
    }
}

/// A referential disagreement between two records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    /// The zone resolved by name for an animal's species is not the zone
    /// the species actually references.
    ZoneSpecies,
    /// A reply's parent comment belongs to a different animal.
    ReplyAnimal,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZoneSpecies => {
                write!(f, "the zone assigned to the animal does not match its species' zone")
            }
            Self::ReplyAnimal => write!(f, "the parent comment belongs to a different animal"),
        }
    }
}

/// An operation that contractually returns records found none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyResult {
    /// The zone store is empty.
    Zones,
    /// The species store is empty.
    Species,
    /// The animal store is empty.
    Animals,
    /// The user store is empty.
    Users,
    /// The animal exists but has no comments yet.
    Comments,
    /// No animal was admitted on the given date.
    AnimalsAdmittedOn(NaiveDate),
}

impl fmt::Display for EmptyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zones => write!(f, "no zones have been recorded"),
            Self::Species => write!(f, "no species have been recorded"),
            Self::Animals => write!(f, "no animals have been recorded"),
            Self::Users => write!(f, "no users have been registered"),
            Self::Comments => write!(f, "this animal has no comments yet"),
            Self::AnimalsAdmittedOn(date) => {
                write!(f, "no animals were admitted on {date}")
            }
        }
    }
}

/// Errors raised by the registry operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// A lookup by identifier or name missed.
    NotFound(Entity),
    /// A case-insensitive unique name (or user email) collision.
    AlreadyExists(Entity),
    /// A species or zone deletion is blocked by the animals it still owns.
    HasDependents(Entity),
    /// Two records that must agree disagree.
    Mismatch(Mismatch),
    /// An operation that requires at least one record found none.
    EmptyResult(EmptyResult),
    /// Malformed caller input, as opposed to a state conflict.
    InvalidInput(String),
    /// The caller identity could not be resolved.
    Unauthorized(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::AlreadyExists(Entity::User) => {
                write!(f, "a user with that email already exists")
            }
            Self::AlreadyExists(entity) => {
                write!(f, "a {entity} with that name already exists")
            }
            Self::HasDependents(entity) => {
                write!(f, "cannot delete this {entity}: it still has animals")
            }
            Self::Mismatch(mismatch) => mismatch.fmt(f),
            Self::EmptyResult(empty) => empty.fmt(f),
            Self::InvalidInput(reason) => write!(f, "invalid input: {reason}"),
            Self::Unauthorized(reason) => write!(f, "unauthorized: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_entity() {
        assert_eq!(Error::NotFound(Entity::Zone).to_string(), "zone not found");
        assert_eq!(
            Error::AlreadyExists(Entity::Species).to_string(),
            "a species with that name already exists"
        );
        assert_eq!(
            Error::AlreadyExists(Entity::User).to_string(),
            "a user with that email already exists"
        );
        assert_eq!(
            Error::HasDependents(Entity::Zone).to_string(),
            "cannot delete this zone: it still has animals"
        );
    }

    #[test]
    fn empty_result_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            Error::EmptyResult(EmptyResult::AnimalsAdmittedOn(date)).to_string(),
            "no animals were admitted on 2024-03-01"
        );
    }
}
