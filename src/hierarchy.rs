//! Structural invariants across zones, species, and animals.
//!
//! Every mutation of the three-level hierarchy goes through the
//! operations in this module: they resolve references by
//! case-insensitive name, guard unique names and dependent records, and
//! only then write. A failed check aborts the operation before any
//! mutation happens.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    domain::{Animal, Name, Species, Zone},
    error::{Entity, Error, Mismatch},
    store::Zoo,
};

/// A zone with its owned species and, transitively, its animals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneDetails {
    /// Zone identifier.
    pub id: Uuid,
    /// Zone name.
    pub name: String,
    /// Names of the species in the zone, in storage order.
    pub species: Vec<String>,
    /// Names of every animal across the zone's species.
    pub animals: Vec<String>,
}

/// A species with its owning zone and its animals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeciesDetails {
    /// Species identifier.
    pub id: Uuid,
    /// Species name.
    pub name: String,
    /// Name of the owning zone.
    pub zone: String,
    /// Names of the species' animals, in storage order.
    pub animals: Vec<String>,
}

/// An animal with its species and the contents of its wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimalDetails {
    /// Animal identifier.
    pub id: Uuid,
    /// Animal name.
    pub name: String,
    /// When the animal entered the zoo.
    pub admitted: DateTime<Utc>,
    /// Name of the owning species.
    pub species: String,
    /// Bodies of the animal's comments, in storage order.
    pub comments: Vec<String>,
}

impl Zoo {
    /// Creates a zone with a unique name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a blank name and
    /// [`Error::AlreadyExists`] on a case-insensitive name collision.
    pub fn create_zone(&mut self, name: &str) -> Result<Uuid, Error> {
        let name = Name::new(name)?;
        if self.zone_name_taken(name.as_str()) {
            return Err(Error::AlreadyExists(Entity::Zone));
        }

        let zone = Zone::new(name);
        let id = zone.id;
        tracing::info!("created zone {}", zone.name);
        self.zones.insert(id, zone);
        Ok(id)
    }

    /// Renames a zone.
    ///
    /// Renaming a zone to a case variant of its current name leaves the
    /// stored casing untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id,
    /// [`Error::InvalidInput`] for a blank name, and
    /// [`Error::AlreadyExists`] when the new name collides with another
    /// zone.
    pub fn edit_zone(&mut self, id: Uuid, new_name: &str) -> Result<(), Error> {
        let new_name = Name::new(new_name)?;
        let unchanged = self
            .zones
            .get(id)
            .ok_or(Error::NotFound(Entity::Zone))?
            .name
            .matches(new_name.as_str());

        if !unchanged {
            if self.zone_name_taken(new_name.as_str()) {
                return Err(Error::AlreadyExists(Entity::Zone));
            }
            let zone = self.zones.get_mut(id).expect("presence checked above");
            tracing::info!("renamed zone {} to {new_name}", zone.name);
            zone.name = new_name;
        }
        Ok(())
    }

    /// Deletes a zone and the species it owns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id and
    /// [`Error::HasDependents`] while any animal lives in the zone,
    /// checked transitively through the zone's species.
    pub fn delete_zone(&mut self, id: Uuid) -> Result<(), Error> {
        if !self.zones.contains(id) {
            return Err(Error::NotFound(Entity::Zone));
        }
        if self.zone_has_animals(id) {
            return Err(Error::HasDependents(Entity::Zone));
        }

        // The guard above leaves only animal-free species to cascade.
        let owned: Vec<Uuid> = self.species_of_zone(id).map(|species| species.id).collect();
        for species_id in owned {
            self.species.remove(species_id);
        }
        let zone = self.zones.remove(id).expect("presence checked above");
        tracing::info!("deleted zone {}", zone.name);
        Ok(())
    }

    /// Looks up one zone by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn zone(&self, id: Uuid) -> Result<ZoneDetails, Error> {
        self.zones
            .get(id)
            .map(|zone| self.zone_details(zone))
            .ok_or(Error::NotFound(Entity::Zone))
    }

    /// Lists every zone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] when no zone has been recorded.
    pub fn all_zones(&self) -> Result<Vec<ZoneDetails>, Error> {
        if self.zones.is_empty() {
            return Err(Error::EmptyResult(crate::error::EmptyResult::Zones));
        }
        Ok(self
            .zones
            .iter()
            .map(|zone| self.zone_details(zone))
            .collect())
    }

    fn zone_details(&self, zone: &Zone) -> ZoneDetails {
        let species: Vec<String> = self
            .species_of_zone(zone.id)
            .map(|species| species.name.to_string())
            .collect();
        let animals: Vec<String> = self
            .species_of_zone(zone.id)
            .flat_map(|species| self.animals_of_species(species.id))
            .map(|animal| animal.name.to_string())
            .collect();
        ZoneDetails {
            id: zone.id,
            name: zone.name.to_string(),
            species,
            animals,
        }
    }

    /// Creates a species with a unique name inside an existing zone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a blank name,
    /// [`Error::AlreadyExists`] on a name collision, and
    /// [`Error::NotFound`] when no zone matches `zone_name`.
    pub fn create_species(&mut self, name: &str, zone_name: &str) -> Result<Uuid, Error> {
        let name = Name::new(name)?;
        if self.species_name_taken(name.as_str()) {
            return Err(Error::AlreadyExists(Entity::Species));
        }
        let zone = self
            .zone_by_name(zone_name)
            .ok_or(Error::NotFound(Entity::Zone))?;

        let species = Species::new(name, zone.id);
        let id = species.id;
        tracing::info!("created species {} in zone {}", species.name, zone.name);
        self.species.insert(id, species);
        Ok(id)
    }

    /// Renames a species and reassigns its zone.
    ///
    /// The zone reference is always reassigned, even when the new zone
    /// is the current one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id or zone name,
    /// [`Error::InvalidInput`] for a blank name, and
    /// [`Error::AlreadyExists`] when the new name collides with a
    /// different species.
    pub fn edit_species(
        &mut self,
        id: Uuid,
        new_name: &str,
        new_zone_name: &str,
    ) -> Result<(), Error> {
        let new_name = Name::new(new_name)?;
        let renamed = !self
            .species
            .get(id)
            .ok_or(Error::NotFound(Entity::Species))?
            .name
            .matches(new_name.as_str());
        if renamed && self.species_name_taken(new_name.as_str()) {
            return Err(Error::AlreadyExists(Entity::Species));
        }
        let zone_id = self
            .zone_by_name(new_zone_name)
            .ok_or(Error::NotFound(Entity::Zone))?
            .id;

        let species = self.species.get_mut(id).expect("presence checked above");
        species.name = new_name;
        species.zone = zone_id;
        tracing::info!("updated species {}", species.name);
        Ok(())
    }

    /// Deletes a species.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id and
    /// [`Error::HasDependents`] while any animal references the species.
    pub fn delete_species(&mut self, id: Uuid) -> Result<(), Error> {
        if !self.species.contains(id) {
            return Err(Error::NotFound(Entity::Species));
        }
        if self.species_has_animals(id) {
            return Err(Error::HasDependents(Entity::Species));
        }

        let species = self.species.remove(id).expect("presence checked above");
        tracing::info!("deleted species {}", species.name);
        Ok(())
    }

    /// Looks up one species by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn species_details(&self, id: Uuid) -> Result<SpeciesDetails, Error> {
        self.species
            .get(id)
            .map(|species| self.species_view(species))
            .ok_or(Error::NotFound(Entity::Species))
    }

    /// Lists every species.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] when no species has been recorded.
    pub fn all_species(&self) -> Result<Vec<SpeciesDetails>, Error> {
        if self.species.is_empty() {
            return Err(Error::EmptyResult(crate::error::EmptyResult::Species));
        }
        Ok(self
            .species
            .iter()
            .map(|species| self.species_view(species))
            .collect())
    }

    fn species_view(&self, species: &Species) -> SpeciesDetails {
        SpeciesDetails {
            id: species.id,
            name: species.name.to_string(),
            zone: self.zone_of(species).name.to_string(),
            animals: self
                .animals_of_species(species.id)
                .map(|animal| animal.name.to_string())
                .collect(),
        }
    }

    /// Admits an animal under an existing species.
    ///
    /// The species' zone is re-derived and double-checked: the zone the
    /// species references must be the zone found when looking its name
    /// up again. On consistent data the check never fires; it guards
    /// against a stale or duplicated name index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a blank name,
    /// [`Error::NotFound`] when the species (or its zone) cannot be
    /// resolved, and [`Error::Mismatch`] when the double-check fails.
    pub fn create_animal(
        &mut self,
        name: &str,
        species_name: &str,
        admitted: Option<DateTime<Utc>>,
    ) -> Result<Uuid, Error> {
        let name = Name::new(name)?;
        let species = self
            .species_by_name(species_name)
            .ok_or(Error::NotFound(Entity::Species))?;
        let species_id = species.id;
        let referenced_zone = species.zone;

        let zone = self
            .zones
            .get(referenced_zone)
            .ok_or(Error::NotFound(Entity::Zone))?;
        let found = self
            .zone_by_name(zone.name.as_str())
            .ok_or(Error::NotFound(Entity::Zone))?;
        if found.id != referenced_zone {
            return Err(Error::Mismatch(Mismatch::ZoneSpecies));
        }

        let animal = Animal::new(name, species_id, admitted);
        let id = animal.id;
        tracing::info!("admitted animal {}", animal.name);
        self.animals.insert(id, animal);
        Ok(id)
    }

    /// Renames an animal and reassigns its species.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown animal id or species
    /// name, and [`Error::InvalidInput`] for a blank name.
    pub fn edit_animal(&mut self, id: Uuid, new_name: &str, species_name: &str) -> Result<(), Error> {
        let new_name = Name::new(new_name)?;
        if !self.animals.contains(id) {
            return Err(Error::NotFound(Entity::Animal));
        }
        let species_id = self
            .species_by_name(species_name)
            .ok_or(Error::NotFound(Entity::Species))?
            .id;

        let animal = self.animals.get_mut(id).expect("presence checked above");
        animal.name = new_name;
        animal.species = species_id;
        tracing::info!("updated animal {}", animal.name);
        Ok(())
    }

    /// Deletes an animal together with its wall.
    ///
    /// The cascade is explicit: comments first, then the animal, inside
    /// the same exclusive borrow, so no comment ever dangles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn delete_animal(&mut self, id: Uuid) -> Result<(), Error> {
        if !self.animals.contains(id) {
            return Err(Error::NotFound(Entity::Animal));
        }

        let owned: Vec<Uuid> = self.comments_of_animal(id).map(|comment| comment.id).collect();
        for comment_id in owned {
            self.comments.remove(comment_id);
        }
        let animal = self.animals.remove(id).expect("presence checked above");
        tracing::info!("deleted animal {}", animal.name);
        Ok(())
    }

    /// Looks up one animal by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn animal(&self, id: Uuid) -> Result<AnimalDetails, Error> {
        self.animals
            .get(id)
            .map(|animal| self.animal_view(animal))
            .ok_or(Error::NotFound(Entity::Animal))
    }

    /// Lists every animal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] when no animal has been recorded.
    pub fn all_animals(&self) -> Result<Vec<AnimalDetails>, Error> {
        if self.animals.is_empty() {
            return Err(Error::EmptyResult(crate::error::EmptyResult::Animals));
        }
        Ok(self
            .animals
            .iter()
            .map(|animal| self.animal_view(animal))
            .collect())
    }

    fn animal_view(&self, animal: &Animal) -> AnimalDetails {
        AnimalDetails {
            id: animal.id,
            name: animal.name.to_string(),
            admitted: animal.admitted,
            species: self.species_of(animal).name.to_string(),
            comments: self
                .comments_of_animal(animal.id)
                .map(|comment| comment.content.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmptyResult;

    fn small_zoo() -> Zoo {
        let mut zoo = Zoo::new();
        zoo.create_zone("Savanna").unwrap();
        zoo.create_species("Lion", "Savanna").unwrap();
        zoo
    }

    #[test]
    fn zone_names_are_unique_ignoring_case() {
        let mut zoo = small_zoo();
        assert_eq!(
            zoo.create_zone("savanna").unwrap_err(),
            Error::AlreadyExists(Entity::Zone)
        );
        assert_eq!(
            zoo.create_zone("  SAVANNA  ").unwrap_err(),
            Error::AlreadyExists(Entity::Zone)
        );
    }

    #[test]
    fn editing_a_zone_to_its_own_case_variant_keeps_the_stored_casing() {
        let mut zoo = small_zoo();
        let id = zoo.zone_by_name("Savanna").unwrap().id;

        zoo.edit_zone(id, "SAVANNA").unwrap();
        assert_eq!(zoo.zone(id).unwrap().name, "Savanna");

        zoo.edit_zone(id, "Grasslands").unwrap();
        assert_eq!(zoo.zone(id).unwrap().name, "Grasslands");
    }

    #[test]
    fn renaming_a_zone_onto_another_collides() {
        let mut zoo = small_zoo();
        zoo.create_zone("Aviary").unwrap();
        let id = zoo.zone_by_name("Aviary").unwrap().id;

        assert_eq!(
            zoo.edit_zone(id, "savanna").unwrap_err(),
            Error::AlreadyExists(Entity::Zone)
        );
    }

    #[test]
    fn species_requires_an_existing_zone() {
        let mut zoo = Zoo::new();
        assert_eq!(
            zoo.create_species("Lion", "Savanna").unwrap_err(),
            Error::NotFound(Entity::Zone)
        );
    }

    #[test]
    fn species_names_are_unique_ignoring_case() {
        let mut zoo = small_zoo();
        assert_eq!(
            zoo.create_species("LION", "Savanna").unwrap_err(),
            Error::AlreadyExists(Entity::Species)
        );
    }

    #[test]
    fn editing_a_species_always_reassigns_the_zone() {
        let mut zoo = small_zoo();
        zoo.create_zone("Grasslands").unwrap();
        let id = zoo.species_by_name("Lion").unwrap().id;

        zoo.edit_species(id, "Lion", "Grasslands").unwrap();
        assert_eq!(zoo.species_details(id).unwrap().zone, "Grasslands");
    }

    #[test]
    fn animals_track_their_species_zone_through_the_live_link() {
        let mut zoo = small_zoo();
        zoo.create_zone("Grasslands").unwrap();
        let leo = zoo.create_animal("Leo", "Lion", None).unwrap();
        let lion = zoo.species_by_name("Lion").unwrap().id;

        // Moving the species moves every animal's effective zone with it.
        zoo.edit_species(lion, "Lion", "Grasslands").unwrap();

        let animal = zoo.animals.get(leo).unwrap();
        let species = zoo.species_of(animal);
        assert_eq!(zoo.zone_of(species).name().as_str(), "Grasslands");
    }

    #[test]
    fn animal_creation_defaults_the_admission_timestamp() {
        let mut zoo = small_zoo();
        let before = Utc::now();
        let id = zoo.create_animal("  Leo  ", "lion", None).unwrap();
        let animal = zoo.animals.get(id).unwrap();

        assert_eq!(animal.name().as_str(), "Leo");
        assert!(animal.admitted() >= before && animal.admitted() <= Utc::now());
    }

    #[test]
    fn animal_creation_detects_a_poisoned_name_index() {
        let mut zoo = small_zoo();
        // Force a duplicate zone name past the uniqueness check; the
        // species points at the shadowed copy.
        let shadowed = Zone::new(Name::new("savanna").unwrap());
        let shadowed_id = shadowed.id;
        zoo.zones.insert(shadowed_id, shadowed);
        let lion = zoo.species_by_name("Lion").unwrap().id;
        zoo.species.get_mut(lion).unwrap().zone = shadowed_id;

        assert_eq!(
            zoo.create_animal("Leo", "Lion", None).unwrap_err(),
            Error::Mismatch(Mismatch::ZoneSpecies)
        );
    }

    #[test]
    fn deleting_an_animal_cascades_to_its_wall() {
        let mut zoo = small_zoo();
        let leo = zoo.create_animal("Leo", "Lion", None).unwrap();
        zoo.register_staff("Ana", "ana@zoo.org", "secret").unwrap();
        let ana = crate::domain::Identity::resolved("ana@zoo.org", crate::domain::Role::Staff)
            .unwrap();
        zoo.add_comment("So majestic", "Leo", &ana, None).unwrap();

        zoo.delete_animal(leo).unwrap();
        assert!(zoo.comments.is_empty());
        assert_eq!(
            zoo.delete_animal(leo).unwrap_err(),
            Error::NotFound(Entity::Animal)
        );
    }

    #[test]
    fn empty_listings_are_reported_as_such() {
        let zoo = Zoo::new();
        assert_eq!(
            zoo.all_zones().unwrap_err(),
            Error::EmptyResult(EmptyResult::Zones)
        );
        assert_eq!(
            zoo.all_species().unwrap_err(),
            Error::EmptyResult(EmptyResult::Species)
        );
        assert_eq!(
            zoo.all_animals().unwrap_err(),
            Error::EmptyResult(EmptyResult::Animals)
        );
    }

    #[test]
    fn zone_listing_flattens_animals_across_species() {
        let mut zoo = small_zoo();
        zoo.create_species("Zebra", "Savanna").unwrap();
        zoo.create_animal("Leo", "Lion", None).unwrap();
        zoo.create_animal("Marty", "Zebra", None).unwrap();

        let zones = zoo.all_zones().unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].species, vec!["Lion", "Zebra"]);
        assert_eq!(zones[0].animals, vec!["Leo", "Marty"]);
    }

    #[test]
    fn deletion_order_is_enforced_bottom_up() {
        let mut zoo = small_zoo();
        let savanna = zoo.zone_by_name("Savanna").unwrap().id;
        let lion = zoo.species_by_name("Lion").unwrap().id;
        let leo = zoo.create_animal("Leo", "Lion", None).unwrap();

        assert_eq!(
            zoo.delete_zone(savanna).unwrap_err(),
            Error::HasDependents(Entity::Zone)
        );
        assert_eq!(
            zoo.delete_species(lion).unwrap_err(),
            Error::HasDependents(Entity::Species)
        );

        zoo.delete_animal(leo).unwrap();
        zoo.delete_species(lion).unwrap();
        zoo.delete_zone(savanna).unwrap();
        assert!(zoo.zones.is_empty());
    }

    #[test]
    fn deleting_a_zone_cascades_its_empty_species() {
        let mut zoo = small_zoo();
        zoo.create_species("Zebra", "Savanna").unwrap();
        let savanna = zoo.zone_by_name("Savanna").unwrap().id;

        zoo.delete_zone(savanna).unwrap();
        assert!(zoo.species.is_empty());
    }

    #[test]
    fn zone_deletion_checks_animals_transitively() {
        let mut zoo = small_zoo();
        // The animal hangs off a species, not the zone itself; the
        // dependent check must still see it.
        zoo.create_animal("Leo", "Lion", None).unwrap();
        let savanna = zoo.zone_by_name("Savanna").unwrap().id;

        assert_eq!(
            zoo.delete_zone(savanna).unwrap_err(),
            Error::HasDependents(Entity::Zone)
        );
    }
}
