//! The in-memory record stores for the whole registry.

use uuid::Uuid;

use crate::{
    domain::{Animal, Comment, Email, Species, User, Zone},
    store::records::Records,
};

/// The registry's record stores.
///
/// `Zoo` owns the five record families and the indexed lookups the
/// engines build on. Every mutating operation takes `&mut self`, so one
/// logical operation holds exclusive access for its whole
/// read-check-then-write sequence; coordination across processes is the
/// embedding store's responsibility.
///
/// The operations themselves live in the [`crate::hierarchy`],
/// [`crate::comments`], [`crate::search`], [`crate::reports`], and
/// [`crate::accounts`] modules.
#[derive(Debug, Clone, Default)]
pub struct Zoo {
    pub(crate) zones: Records<Zone>,
    pub(crate) species: Records<Species>,
    pub(crate) animals: Records<Animal>,
    pub(crate) comments: Records<Comment>,
    pub(crate) users: Records<User>,
}

impl Zoo {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Case-insensitive name lookups return the first match in storage
    // order, mirroring an indexed find on a unique column.

    pub(crate) fn zone_by_name(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.name.matches(name))
    }

    pub(crate) fn species_by_name(&self, name: &str) -> Option<&Species> {
        self.species.iter().find(|species| species.name.matches(name))
    }

    pub(crate) fn animal_by_name(&self, name: &str) -> Option<&Animal> {
        self.animals.iter().find(|animal| animal.name.matches(name))
    }

    pub(crate) fn zone_name_taken(&self, name: &str) -> bool {
        self.zone_by_name(name).is_some()
    }

    pub(crate) fn species_name_taken(&self, name: &str) -> bool {
        self.species_by_name(name).is_some()
    }

    pub(crate) fn user_by_email(&self, email: &Email) -> Option<&User> {
        self.users.iter().find(|user| user.email == *email)
    }

    pub(crate) fn species_has_animals(&self, species: Uuid) -> bool {
        self.animals.iter().any(|animal| animal.species == species)
    }

    /// Whether any animal lives in the zone, checked transitively through
    /// the zone's species.
    pub(crate) fn zone_has_animals(&self, zone: Uuid) -> bool {
        self.animals.iter().any(|animal| {
            self.species
                .get(animal.species)
                .is_some_and(|species| species.zone == zone)
        })
    }

    pub(crate) fn species_of_zone(&self, zone: Uuid) -> impl Iterator<Item = &Species> + '_ {
        self.species.iter().filter(move |species| species.zone == zone)
    }

    pub(crate) fn animals_of_species(&self, species: Uuid) -> impl Iterator<Item = &Animal> + '_ {
        self.animals.iter().filter(move |animal| animal.species == species)
    }

    pub(crate) fn comments_of_animal(&self, animal: Uuid) -> impl Iterator<Item = &Comment> + '_ {
        self.comments.iter().filter(move |comment| comment.animal == animal)
    }

    // Infallible resolvers for references the validator keeps consistent.

    pub(crate) fn species_of(&self, animal: &Animal) -> &Species {
        self.species
            .get(animal.species)
            .expect("animal references a missing species")
    }

    pub(crate) fn zone_of(&self, species: &Species) -> &Zone {
        self.zones
            .get(species.zone)
            .expect("species references a missing zone")
    }

    pub(crate) fn author_of(&self, comment: &Comment) -> &User {
        self.users
            .get(comment.author)
            .expect("comment references a missing author")
    }
}
