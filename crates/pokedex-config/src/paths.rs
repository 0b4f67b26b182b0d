//! Derives the journal file layout from the shared configuration.
//!
//! The server writes three independent append-only streams into a single
//! directory. Rotated archives land next to the live files with a timestamp
//! suffix, so everything an operator needs sits under `log_dir`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::Config;

/// File name of the server activity stream.
pub const SERVER_LOG_FILE: &str = "server.log";
/// File name of the query stream.
pub const QUERY_LOG_FILE: &str = "queries.log";
/// File name of the error stream.
pub const ERROR_LOG_FILE: &str = "errors.log";

/// Canonical paths of the journal files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaths {
    log_dir: PathBuf,
    server_log: PathBuf,
    query_log: PathBuf,
    error_log: PathBuf,
}

impl LogPaths {
    /// Derives journal paths from the configuration, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns [`LogPathsError::LogDirectory`] when the directory cannot be
    /// created.
    pub fn from_config(config: &Config) -> Result<Self, LogPathsError> {
        Self::in_directory(config.log_dir().as_std_path())
    }

    /// Derives journal paths rooted at `log_dir`, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns [`LogPathsError::LogDirectory`] when the directory cannot be
    /// created.
    pub fn in_directory(log_dir: impl AsRef<Path>) -> Result<Self, LogPathsError> {
        let log_dir = log_dir.as_ref().to_path_buf();
        fs::create_dir_all(&log_dir).map_err(|source| LogPathsError::LogDirectory {
            path: log_dir.clone(),
            source,
        })?;
        Ok(Self {
            server_log: log_dir.join(SERVER_LOG_FILE),
            query_log: log_dir.join(QUERY_LOG_FILE),
            error_log: log_dir.join(ERROR_LOG_FILE),
            log_dir,
        })
    }

    /// Directory holding the journal files and their archives.
    pub fn log_dir(&self) -> &Path {
        self.log_dir.as_path()
    }

    /// Path of the server activity stream.
    pub fn server_log(&self) -> &Path {
        self.server_log.as_path()
    }

    /// Path of the query stream.
    pub fn query_log(&self) -> &Path {
        self.query_log.as_path()
    }

    /// Path of the error stream.
    pub fn error_log(&self) -> &Path {
        self.error_log.as_path()
    }
}

/// Errors raised while preparing the journal directory.
#[derive(Debug, Error)]
pub enum LogPathsError {
    /// Creating the log directory failed.
    #[error("failed to prepare log directory '{path}': {source}")]
    LogDirectory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
