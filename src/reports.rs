//! Read-side aggregation over the hierarchy.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    error::{EmptyResult, Error},
    store::Zoo,
};

/// Animal head-count for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneCensus {
    /// Zone name.
    pub zone: String,
    /// Number of animals across the zone's species.
    pub animals: usize,
}

/// Animal head-count for one species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeciesCensus {
    /// Species name.
    pub species: String,
    /// Number of animals in the species.
    pub animals: usize,
}

/// One admission on the requested date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admission {
    /// Animal name.
    pub animal: String,
    /// Name of the animal's species.
    pub species: String,
    /// Name of the animal's zone, derived through its species.
    pub zone: String,
}

impl Zoo {
    /// Per-zone animal counts, counted transitively through each zone's
    /// species. Zones without animals are reported with a count of 0,
    /// not omitted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] only when the zone store itself is
    /// empty.
    pub fn animals_by_zone(&self) -> Result<Vec<ZoneCensus>, Error> {
        if self.zones.is_empty() {
            return Err(Error::EmptyResult(EmptyResult::Zones));
        }
        Ok(self
            .zones
            .iter()
            .map(|zone| ZoneCensus {
                zone: zone.name().to_string(),
                animals: self
                    .species_of_zone(zone.id())
                    .map(|species| self.animals_of_species(species.id()).count())
                    .sum(),
            })
            .collect())
    }

    /// Per-species animal counts. Species without animals report 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] only when the species store itself
    /// is empty.
    pub fn animals_by_species(&self) -> Result<Vec<SpeciesCensus>, Error> {
        if self.species.is_empty() {
            return Err(Error::EmptyResult(EmptyResult::Species));
        }
        Ok(self
            .species
            .iter()
            .map(|species| SpeciesCensus {
                species: species.name().to_string(),
                animals: self.animals_of_species(species.id()).count(),
            })
            .collect())
    }

    /// Animals admitted within the given UTC day, both bounds inclusive:
    /// `[00:00:00.000000, 23:59:59.999999]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] naming the date when no admission
    /// falls inside it.
    pub fn admitted_on(&self, date: NaiveDate) -> Result<Vec<Admission>, Error> {
        let start = date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc();
        let end = date
            .and_hms_micro_opt(23, 59, 59, 999_999)
            .expect("the last microsecond of a day is a valid time")
            .and_utc();

        let admissions: Vec<Admission> = self
            .animals
            .iter()
            .filter(|animal| animal.admitted() >= start && animal.admitted() <= end)
            .map(|animal| {
                let species = self.species_of(animal);
                Admission {
                    animal: animal.name().to_string(),
                    species: species.name().to_string(),
                    zone: self.zone_of(species).name().to_string(),
                }
            })
            .collect();

        if admissions.is_empty() {
            return Err(Error::EmptyResult(EmptyResult::AnimalsAdmittedOn(date)));
        }
        Ok(admissions)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn zoo_with_counts() -> Zoo {
        let mut zoo = Zoo::new();
        zoo.create_zone("Savanna").unwrap();
        zoo.create_zone("Aviary").unwrap();
        zoo.create_species("Lion", "Savanna").unwrap();
        zoo.create_species("Zebra", "Savanna").unwrap();
        zoo.create_species("Penguin", "Aviary").unwrap();
        zoo.create_animal("Leo", "Lion", None).unwrap();
        zoo.create_animal("Nala", "Lion", None).unwrap();
        zoo.create_animal("Marty", "Zebra", None).unwrap();
        zoo
    }

    #[test]
    fn zone_counts_flatten_species_and_keep_empty_zones() {
        let zoo = zoo_with_counts();
        let census = zoo.animals_by_zone().unwrap();

        assert_eq!(
            census,
            vec![
                ZoneCensus {
                    zone: "Savanna".to_string(),
                    animals: 3
                },
                ZoneCensus {
                    zone: "Aviary".to_string(),
                    animals: 0
                },
            ]
        );
    }

    #[test]
    fn species_counts_keep_empty_species() {
        let zoo = zoo_with_counts();
        let census = zoo.animals_by_species().unwrap();

        let penguins = census
            .iter()
            .find(|entry| entry.species == "Penguin")
            .unwrap();
        assert_eq!(penguins.animals, 0);
        let lions = census.iter().find(|entry| entry.species == "Lion").unwrap();
        assert_eq!(lions.animals, 2);
    }

    #[test]
    fn counts_on_an_empty_registry_are_an_empty_result() {
        let zoo = Zoo::new();
        assert_eq!(
            zoo.animals_by_zone().unwrap_err(),
            Error::EmptyResult(EmptyResult::Zones)
        );
        assert_eq!(
            zoo.animals_by_species().unwrap_err(),
            Error::EmptyResult(EmptyResult::Species)
        );
    }

    #[test]
    fn admission_day_bounds_are_inclusive() {
        let mut zoo = Zoo::new();
        zoo.create_zone("Savanna").unwrap();
        zoo.create_species("Lion", "Savanna").unwrap();

        let midnight = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let last_micro = Utc
            .with_ymd_and_hms(2024, 3, 1, 23, 59, 59)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(999_999))
            .unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        zoo.create_animal("Early", "Lion", Some(midnight)).unwrap();
        zoo.create_animal("Late", "Lion", Some(last_micro)).unwrap();
        zoo.create_animal("Tomorrow", "Lion", Some(next_day)).unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let admissions = zoo.admitted_on(date).unwrap();
        let names: Vec<&str> = admissions
            .iter()
            .map(|admission| admission.animal.as_str())
            .collect();

        assert_eq!(names, vec!["Early", "Late"]);
        assert_eq!(admissions[0].species, "Lion");
        assert_eq!(admissions[0].zone, "Savanna");
    }

    #[test]
    fn a_day_without_admissions_names_the_date() {
        let zoo = zoo_with_counts();
        let date = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
        assert_eq!(
            zoo.admitted_on(date).unwrap_err(),
            Error::EmptyResult(EmptyResult::AnimalsAdmittedOn(date))
        );
    }
}
