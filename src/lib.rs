//! Zoo registry and commentary management
//!
//! Zones own species, species own animals, and animals carry threaded
//! commentary walls. This crate keeps those relationships consistent
//! under every mutation, and answers keyword searches and aggregate
//! reports over the same records.

/// Staff-user registration and listing.
pub mod accounts;
pub use accounts::UserDetails;

/// Threaded commentary walls on animals.
pub mod comments;
pub use comments::ThreadNode;

pub mod domain;
pub use domain::{Animal, Comment, Email, Identity, Name, Role, Species, User, Zone};

pub mod error;
pub use error::{Entity, Error};

/// Structural invariants across zones, species, and animals.
pub mod hierarchy;
pub use hierarchy::{AnimalDetails, SpeciesDetails, ZoneDetails};

/// Aggregation reports over the hierarchy.
pub mod reports;
pub use reports::{Admission, SpeciesCensus, ZoneCensus};

/// Cross-record keyword search.
pub mod search;
pub use search::Hit;

/// Record stores and snapshot persistence.
pub mod store;
pub use store::{Repository, Zoo};
