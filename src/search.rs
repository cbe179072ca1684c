//! Cross-record keyword search.
//!
//! One query scans four unrelated record families and flattens the hits
//! into a single tagged stream: zones first, then species, animals, and
//! comment content, each family in storage order. There is no ranking.

use serde::Serialize;

use crate::store::Zoo;

/// A single keyword hit, tagged with the record family it came from.
///
/// Serialized with an uppercase `kind` tag so front doors can pass the
/// stream through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Hit {
    /// A zone whose name matched.
    #[serde(rename = "ZONE")]
    Zone {
        /// Zone name.
        zone: String,
    },
    /// A species whose name matched.
    #[serde(rename = "SPECIES")]
    Species {
        /// Name of the owning zone.
        zone: String,
        /// Species name.
        species: String,
    },
    /// An animal whose name matched.
    #[serde(rename = "ANIMAL")]
    Animal {
        /// Name of the animal's zone, derived through its species.
        zone: String,
        /// Name of the animal's species.
        species: String,
        /// Animal name.
        animal: String,
    },
    /// A root comment whose content matched.
    #[serde(rename = "COMMENT")]
    Comment {
        /// Name of the animal's zone.
        zone: String,
        /// Name of the animal's species.
        species: String,
        /// Name of the animal the comment sits on.
        animal: String,
        /// The matching comment's body.
        comment: String,
    },
    /// A reply whose content matched; carries the parent's content too.
    #[serde(rename = "REPLY")]
    Reply {
        /// Name of the animal's zone.
        zone: String,
        /// Name of the animal's species.
        species: String,
        /// Name of the animal the thread sits on.
        animal: String,
        /// Body of the parent comment.
        comment: String,
        /// Body of the matching reply.
        reply: String,
    },
}

impl Zoo {
    /// Case-insensitive substring search across zone names, species
    /// names, animal names, and comment content.
    ///
    /// No hits is an empty vector, never an error; callers decide how to
    /// signal "no results".
    #[must_use]
    pub fn search(&self, keyword: &str) -> Vec<Hit> {
        let needle = keyword.to_lowercase();
        let mut hits = Vec::new();

        for zone in self.zones.iter() {
            if zone.name().as_str().to_lowercase().contains(&needle) {
                hits.push(Hit::Zone {
                    zone: zone.name().to_string(),
                });
            }
        }

        for species in self.species.iter() {
            if species.name().as_str().to_lowercase().contains(&needle) {
                hits.push(Hit::Species {
                    zone: self.zone_of(species).name().to_string(),
                    species: species.name().to_string(),
                });
            }
        }

        for animal in self.animals.iter() {
            if animal.name().as_str().to_lowercase().contains(&needle) {
                let species = self.species_of(animal);
                hits.push(Hit::Animal {
                    zone: self.zone_of(species).name().to_string(),
                    species: species.name().to_string(),
                    animal: animal.name().to_string(),
                });
            }
        }

        for comment in self.comments.iter() {
            if !comment.content().to_lowercase().contains(&needle) {
                continue;
            }
            let animal = self
                .animals
                .get(comment.animal())
                .expect("comment references a missing animal");
            let species = self.species_of(animal);
            let zone = self.zone_of(species).name().to_string();

            match comment.parent() {
                None => hits.push(Hit::Comment {
                    zone,
                    species: species.name().to_string(),
                    animal: animal.name().to_string(),
                    comment: comment.content().to_string(),
                }),
                Some(parent_id) => {
                    let parent = self
                        .comments
                        .get(parent_id)
                        .expect("reply references a missing parent");
                    hits.push(Hit::Reply {
                        zone,
                        species: species.name().to_string(),
                        animal: animal.name().to_string(),
                        comment: parent.content().to_string(),
                        reply: comment.content().to_string(),
                    });
                }
            }
        }

        hits
    }
}
