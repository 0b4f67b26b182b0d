//! Durable three-stream journal.
//!
//! The [`Journal`] owns the server, queries and errors streams. Every record
//! is appended to exactly one file and mirrored as a `tracing` event on the
//! console sink. Logging never fails from the caller's point of view: write
//! and rotation problems are reported as console warnings only.
//!
//! Each stream rotates on its own once its file grows past the configured
//! threshold. The check runs before every append and can also be triggered
//! with [`Journal::rotate`] or [`Journal::rotate_all`].

mod clock;
mod errors;
mod record;
mod stream;

use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;

use pokedex_config::LogPaths;

pub use self::clock::{Clock, SystemClock};
pub use self::errors::JournalError;
pub use self::record::{Severity, StreamKind};
pub use self::stream::RotationOutcome;

use self::record::{error_message, leveled_line, plain_line, query_message, trace_block};
use self::stream::LogStream;

#[cfg(test)]
pub(crate) use self::clock::MockClock;
#[cfg(test)]
pub(crate) use self::stream::read_to_string;

/// Tracing target for console mirrors of journal records.
pub const JOURNAL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::journal");

/// The process-wide structured logger.
///
/// Constructed once at startup and shared through an [`Arc`].
pub struct Journal {
    server: LogStream,
    queries: LogStream,
    errors: LogStream,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Journal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Journal")
            .field("server", &self.server)
            .field("queries", &self.queries)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl Journal {
    /// Opens the three streams under `paths`, stamping records with the
    /// system clock.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Open`] when any stream file cannot be opened.
    pub fn open(paths: &LogPaths, rotation_threshold: u64) -> Result<Self, JournalError> {
        Self::with_clock(paths, rotation_threshold, Arc::new(SystemClock))
    }

    /// Opens the three streams with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Open`] when any stream file cannot be opened.
    pub fn with_clock(
        paths: &LogPaths,
        rotation_threshold: u64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, JournalError> {
        Ok(Self {
            server: LogStream::open(StreamKind::Server, paths.server_log(), rotation_threshold)?,
            queries: LogStream::open(StreamKind::Queries, paths.query_log(), rotation_threshold)?,
            errors: LogStream::open(StreamKind::Errors, paths.error_log(), rotation_threshold)?,
            clock,
        })
    }

    /// Records an accepted query on the queries stream.
    pub fn log_query(&self, query: &str, user: Option<&str>) {
        let message = query_message(query, user);
        mirror(StreamKind::Queries, Severity::Info, &message);
        let line = plain_line(self.clock.now(), &message);
        self.append(&self.queries, &line);
    }

    /// Records a failure on the errors stream.
    ///
    /// The record is followed by a trace block naming the caller's source
    /// location and every error in the `source()` chain.
    #[track_caller]
    pub fn log_error(&self, error: &dyn Error, context: Option<&str>) {
        let location = Location::caller();
        let message = error_message(error, context);
        mirror(StreamKind::Errors, Severity::Error, &message);
        let mut line = leveled_line(self.clock.now(), Severity::Error, &message);
        line.push_str(&trace_block(error, location));
        self.append(&self.errors, &line);
    }

    /// Records lifecycle or request activity on the server stream.
    pub fn log_activity(&self, message: &str, severity: Severity) {
        mirror(StreamKind::Server, severity, message);
        let line = leveled_line(self.clock.now(), severity, message);
        self.append(&self.server, &line);
    }

    /// Rotates `kind` if its file exceeds the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] when flushing, renaming or reopening fails.
    pub fn rotate(&self, kind: StreamKind) -> Result<RotationOutcome, JournalError> {
        let stream = self.stream(kind);
        let outcome = stream.rotate(self.clock.as_ref());
        if let Ok(RotationOutcome::Rotated { archive }) = &outcome {
            announce_rotation(stream, archive);
        }
        outcome
    }

    /// Applies [`Journal::rotate`] to every stream.
    pub fn rotate_all(&self) -> Vec<(StreamKind, Result<RotationOutcome, JournalError>)> {
        StreamKind::ALL
            .into_iter()
            .map(|kind| (kind, self.rotate(kind)))
            .collect()
    }

    /// Path of the live file backing `kind`.
    #[must_use]
    pub fn path(&self, kind: StreamKind) -> &Path {
        self.stream(kind).path()
    }

    fn stream(&self, kind: StreamKind) -> &LogStream {
        match kind {
            StreamKind::Server => &self.server,
            StreamKind::Queries => &self.queries,
            StreamKind::Errors => &self.errors,
        }
    }

    fn append(&self, stream: &LogStream, line: &str) {
        let outcome = stream.append(line, self.clock.as_ref());
        match outcome.rotation {
            Ok(RotationOutcome::Rotated { archive }) => announce_rotation(stream, &archive),
            Ok(RotationOutcome::Skipped) => {}
            Err(error) => tracing::warn!(
                target: JOURNAL_TARGET,
                stream = %stream.kind(),
                error = %error,
                "log rotation failed"
            ),
        }
        if let Err(error) = outcome.written {
            tracing::warn!(
                target: JOURNAL_TARGET,
                stream = %stream.kind(),
                error = %error,
                "failed to append log record"
            );
        }
    }
}

fn announce_rotation(stream: &LogStream, archive: &Path) {
    tracing::info!(
        target: JOURNAL_TARGET,
        stream = %stream.kind(),
        archive = %archive.display(),
        "rotated log file"
    );
}

fn mirror(stream: StreamKind, severity: Severity, message: &str) {
    match severity {
        Severity::Debug => tracing::debug!(target: JOURNAL_TARGET, %stream, "{message}"),
        Severity::Info => tracing::info!(target: JOURNAL_TARGET, %stream, "{message}"),
        Severity::Warning => tracing::warn!(target: JOURNAL_TARGET, %stream, "{message}"),
        Severity::Error | Severity::Critical => {
            tracing::error!(target: JOURNAL_TARGET, %stream, %severity, "{message}");
        }
    }
}
