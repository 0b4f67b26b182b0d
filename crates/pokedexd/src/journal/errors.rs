//! Failures raised while opening, writing or rotating a journal stream.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while maintaining a journal stream.
///
/// These never reach a caller of the logging methods; they are returned only
/// from [`Journal::open`](super::Journal::open) and the explicit rotation API.
#[derive(Debug, Error)]
pub enum JournalError {
    /// A stream's backing file could not be opened.
    #[error("failed to open log file '{path}': {source}")]
    Open {
        /// File that could not be opened.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Appending a record failed.
    #[error("failed to write log file '{path}': {source}")]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Archiving a stream failed.
    #[error("failed to rotate log file '{path}' to '{archive}': {source}")]
    Rotate {
        /// Live file being rotated.
        path: PathBuf,
        /// Intended archive location.
        archive: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}
