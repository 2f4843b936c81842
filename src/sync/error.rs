//! Error types for mirror operations.
//!
//! Every variant is scoped to a single filesystem entry. Callers log the
//! error and move on to the next item; one bad entry never aborts a run.

use std::io;
use std::path::PathBuf;

/// Error raised while processing one entry.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// An entry could not be listed or stat'ed during a tree scan.
    #[error("Failed to scan {path}: {source}")]
    Scan {
        /// The entry that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A file could not be opened or read for hashing.
    #[error("Failed to read and hash file {path}: {source}")]
    Hash {
        /// The file whose comparison was abandoned.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A copy into the replica failed.
    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        /// The source file.
        from: PathBuf,
        /// The replica destination.
        to: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A directory could not be created in the replica.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An entry could not be removed from the replica.
    #[error("Failed to delete {path}: {source}")]
    Delete {
        /// The entry that could not be removed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A file queued for comparison is not under the source root.
    #[error("File {path} is outside the source tree {root}")]
    OutsideRoot {
        /// The stray file.
        path: PathBuf,
        /// The expected source root.
        root: PathBuf,
    },
}
