use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Name;

/// An individual specimen belonging to exactly one species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub(crate) id: Uuid,
    pub(crate) name: Name,
    /// When the animal entered the zoo.
    pub(crate) admitted: DateTime<Utc>,
    /// Identifier of the owning species.
    pub(crate) species: Uuid,
}

impl Animal {
    /// Creates an animal, defaulting the admission timestamp to now.
    pub(crate) fn new(name: Name, species: Uuid, admitted: Option<DateTime<Utc>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            admitted: admitted.unwrap_or_else(Utc::now),
            species,
        }
    }

    /// The animal's opaque identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The animal's display name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// When the animal entered the zoo.
    #[must_use]
    pub const fn admitted(&self) -> DateTime<Utc> {
        self.admitted
    }

    /// Identifier of the species this animal belongs to.
    #[must_use]
    pub const fn species(&self) -> Uuid {
        self.species
    }
}
