use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Name;

/// A taxonomic grouping within exactly one zone.
///
/// The species' zone reference is authoritative for every animal in the
/// species: an animal's effective zone is always re-derived through this
/// link and never stored on the animal itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub(crate) id: Uuid,
    pub(crate) name: Name,
    /// Identifier of the owning zone.
    pub(crate) zone: Uuid,
}

impl Species {
    pub(crate) fn new(name: Name, zone: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            zone,
        }
    }

    /// The species' opaque identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The species' display name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// Identifier of the zone this species belongs to.
    #[must_use]
    pub const fn zone(&self) -> Uuid {
        self.zone
    }
}
