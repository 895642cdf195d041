//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// Covers the failures the file system collaborator can report and the
/// lookups into a selection tree that can go stale between UI round-trips.
/// "Snippet not found" is deliberately absent: it is a normal outcome.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Represents an I/O error, typically from file system operations.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// Represents a path that was expected to be a directory but was not.
    #[error("Path is not a valid directory: {0}")]
    NotADirectory(PathBuf),

    /// A node id that does not belong to the tree it was used with.
    #[error("Unknown tree node: {0}")]
    UnknownNode(usize),
}
