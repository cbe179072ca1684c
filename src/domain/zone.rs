use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Name;

/// A top-level habitat grouping.
///
/// A zone owns its species exclusively; deleting a zone removes them,
/// which is only permitted once no animal lives anywhere in the zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub(crate) id: Uuid,
    pub(crate) name: Name,
}

impl Zone {
    pub(crate) fn new(name: Name) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }

    /// The zone's opaque identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The zone's display name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }
}
