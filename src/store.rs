//! Record stores and the snapshot persistence shell.

mod records;

/// Filesystem-backed snapshot persistence.
pub mod repository;
pub use repository::{Repository, SnapshotError};

mod zoo;
pub use zoo::Zoo;
