//! A filesystem-backed home for one registry snapshot.
//!
//! This is the thin, interchangeable persistence shell: the engines
//! never touch the filesystem, they only see a loaded [`Zoo`].

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Animal, Comment, Species, User, Zone},
    store::Zoo,
};

const SNAPSHOT_FILE: &str = "zoo.json";

/// Serialized form of the registry: the five record families as plain
/// vectors in insertion order.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    zones: Vec<Zone>,
    species: Vec<Species>,
    animals: Vec<Animal>,
    comments: Vec<Comment>,
    users: Vec<User>,
}

impl From<&Zoo> for Snapshot {
    fn from(zoo: &Zoo) -> Self {
        Self {
            zones: zoo.zones.iter().cloned().collect(),
            species: zoo.species.iter().cloned().collect(),
            animals: zoo.animals.iter().cloned().collect(),
            comments: zoo.comments.iter().cloned().collect(),
            users: zoo.users.iter().cloned().collect(),
        }
    }
}

impl From<Snapshot> for Zoo {
    fn from(snapshot: Snapshot) -> Self {
        let mut zoo = Self::new();
        for zone in snapshot.zones {
            zoo.zones.insert(zone.id, zone);
        }
        for species in snapshot.species {
            zoo.species.insert(species.id, species);
        }
        for animal in snapshot.animals {
            zoo.animals.insert(animal.id, animal);
        }
        for comment in snapshot.comments {
            zoo.comments.insert(comment.id, comment);
        }
        for user in snapshot.users {
            zoo.users.insert(user.id, user);
        }
        zoo
    }
}

/// Errors reading or writing the snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot file could not be read or written.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The snapshot contents are not valid for this registry.
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A directory holding one registry snapshot.
#[derive(Debug, Clone)]
pub struct Repository {
    /// Root directory the snapshot lives in.
    root: PathBuf,
}

impl Repository {
    /// Opens a repository rooted at the given directory.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn snapshot_path(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILE)
    }

    /// Loads the registry snapshot.
    ///
    /// A repository that has never been saved to yields an empty
    /// registry rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot file exists but cannot be read
    /// or parsed.
    pub fn load(&self) -> Result<Zoo, SnapshotError> {
        let path = self.snapshot_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no snapshot at {}, starting empty", path.display());
                return Ok(Zoo::new());
            }
            Err(e) => return Err(SnapshotError::Io(e)),
        };
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        Ok(snapshot.into())
    }

    /// Saves the registry snapshot, creating the root directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self, zoo: &Zoo) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.root)?;
        let raw = serde_json::to_string_pretty(&Snapshot::from(zoo))?;
        fs::write(self.snapshot_path(), raw)?;
        Ok(())
    }

    /// The directory the snapshot lives in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_snapshot_loads_as_empty() {
        let tmp = TempDir::new().unwrap();
        let repo = Repository::new(tmp.path().to_path_buf());

        let zoo = repo.load().unwrap();
        assert!(zoo.zones.is_empty());
    }

    #[test]
    fn snapshot_round_trip_preserves_records_and_order() {
        let tmp = TempDir::new().unwrap();
        let repo = Repository::new(tmp.path().to_path_buf());

        let mut zoo = Zoo::new();
        zoo.create_zone("Savanna").unwrap();
        zoo.create_zone("Aviary").unwrap();
        zoo.create_species("Lion", "Savanna").unwrap();
        let leo = zoo.create_animal("Leo", "Lion", None).unwrap();
        repo.save(&zoo).unwrap();

        let reloaded = repo.load().unwrap();
        let names: Vec<String> = reloaded
            .zones
            .iter()
            .map(|zone| zone.name().to_string())
            .collect();
        assert_eq!(names, vec!["Savanna", "Aviary"]);
        assert!(reloaded.animals.contains(leo));
    }

    #[test]
    fn garbage_snapshot_is_reported_as_malformed() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("zoo.json"), "not json").unwrap();
        let repo = Repository::new(tmp.path().to_path_buf());

        assert!(matches!(repo.load(), Err(SnapshotError::Malformed(_))));
    }
}
