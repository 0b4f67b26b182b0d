//! A single append-only log file with size-based rotation.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::clock::Clock;
use super::errors::JournalError;
use super::record::{StreamKind, archive_suffix};

/// Upper bound on collision suffixes tried for one archive timestamp.
const MAX_ARCHIVE_COLLISIONS: u32 = 1_000;

/// Result of a rotation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The file was at or below the threshold and left in place.
    Skipped,
    /// The file was archived and a fresh one opened.
    Rotated {
        /// Where the previous contents now live.
        archive: PathBuf,
    },
}

/// One stream of the journal.
///
/// The mutex covers the size check, the rename and the write, so no record
/// can land in a file that is being archived.
#[derive(Debug)]
pub(crate) struct LogStream {
    kind: StreamKind,
    path: PathBuf,
    threshold: u64,
    writer: Mutex<Option<File>>,
}

impl LogStream {
    /// Opens (or creates) the stream's file in append mode.
    pub(crate) fn open(
        kind: StreamKind,
        path: impl Into<PathBuf>,
        threshold: u64,
    ) -> Result<Self, JournalError> {
        let path = path.into();
        let file = open_append(&path)?;
        Ok(Self {
            kind,
            path,
            threshold,
            writer: Mutex::new(Some(file)),
        })
    }

    pub(crate) fn kind(&self) -> StreamKind {
        self.kind
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `record`, rotating first when the file is over the threshold.
    ///
    /// A failed rotation does not prevent the write; the record goes to the
    /// live file and the rotation error is returned alongside.
    pub(crate) fn append(&self, record: &str, clock: &dyn Clock) -> AppendOutcome {
        let mut writer = self.lock();
        let rotation = self.rotate_locked(&mut writer, clock);
        let written = self.write_locked(&mut writer, record);
        AppendOutcome { rotation, written }
    }

    /// Rotates the stream if it exceeds the threshold.
    pub(crate) fn rotate(&self, clock: &dyn Clock) -> Result<RotationOutcome, JournalError> {
        let mut writer = self.lock();
        self.rotate_locked(&mut writer, clock)
    }

    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_locked(&self, writer: &mut Option<File>, record: &str) -> Result<(), JournalError> {
        let file = match writer.take() {
            Some(file) => file,
            None => open_append(&self.path)?,
        };
        let file = writer.insert(file);
        file.write_all(record.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| JournalError::Write {
                path: self.path.clone(),
                source,
            })
    }

    fn rotate_locked(
        &self,
        writer: &mut Option<File>,
        clock: &dyn Clock,
    ) -> Result<RotationOutcome, JournalError> {
        if self.current_size(writer.as_ref()) <= self.threshold {
            return Ok(RotationOutcome::Skipped);
        }

        let archive = self.archive_path(&archive_suffix(clock.now()))?;

        if let Some(mut file) = writer.take() {
            file.flush().map_err(|source| JournalError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let renamed = fs::rename(&self.path, &archive);
        // Reopen whatever now lives at the original path, even after a
        // failed rename, so the next record has somewhere to go.
        *writer = open_append(&self.path).ok();
        renamed.map_err(|source| JournalError::Rotate {
            path: self.path.clone(),
            archive: archive.clone(),
            source,
        })?;

        Ok(RotationOutcome::Rotated { archive })
    }

    fn current_size(&self, file: Option<&File>) -> u64 {
        let metadata = match file {
            Some(file) => file.metadata(),
            None => fs::metadata(&self.path),
        };
        metadata.map(|meta| meta.len()).unwrap_or(0)
    }

    /// First unused archive name for `suffix`.
    ///
    /// Existing archives are never overwritten; once every collision suffix
    /// is taken the rotation fails instead.
    fn archive_path(&self, suffix: &str) -> Result<PathBuf, JournalError> {
        let base = format!("{}.{suffix}", self.path.display());
        let candidate = PathBuf::from(&base);
        if !candidate.exists() {
            return Ok(candidate);
        }
        (1..MAX_ARCHIVE_COLLISIONS)
            .map(|index| PathBuf::from(format!("{base}.{index}")))
            .find(|path| !path.exists())
            .ok_or_else(|| JournalError::Rotate {
                path: self.path.clone(),
                archive: candidate,
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "every archive name for this timestamp is taken",
                ),
            })
    }
}

/// What happened during one append.
#[derive(Debug)]
pub(crate) struct AppendOutcome {
    pub(crate) rotation: Result<RotationOutcome, JournalError>,
    pub(crate) written: Result<(), JournalError>,
}

fn open_append(path: &Path) -> Result<File, JournalError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| JournalError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Reads a whole log file, treating a missing file as empty.
#[cfg(test)]
pub(crate) fn read_to_string(path: &Path) -> std::io::Result<String> {
    match fs::read_to_string(path) {
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use tempfile::TempDir;
    use time::macros::datetime;

    use super::*;
    use crate::journal::clock::MockClock;

    #[fixture]
    fn log_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn fixed_clock() -> MockClock {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .returning(|| datetime!(2024-05-01 12:30:45 UTC));
        clock
    }

    #[rstest]
    fn appends_are_flushed_immediately(log_dir: TempDir) {
        let path = log_dir.path().join("server.log");
        let stream = LogStream::open(StreamKind::Server, &path, 1024).expect("open stream");

        let outcome = stream.append("first\n", &fixed_clock());

        assert!(outcome.written.is_ok());
        assert_eq!(read_to_string(&path).expect("read"), "first\n");
    }

    #[rstest]
    fn below_threshold_is_not_rotated(log_dir: TempDir) {
        let path = log_dir.path().join("queries.log");
        let stream = LogStream::open(StreamKind::Queries, &path, 1024).expect("open stream");
        stream.append("short\n", &fixed_clock());

        let outcome = stream.rotate(&fixed_clock()).expect("rotate");

        assert_eq!(outcome, RotationOutcome::Skipped);
    }

    #[rstest]
    fn oversized_file_is_archived_before_next_write(log_dir: TempDir) {
        let path = log_dir.path().join("errors.log");
        let stream = LogStream::open(StreamKind::Errors, &path, 8).expect("open stream");
        stream.append("0123456789\n", &fixed_clock());

        let outcome = stream.append("next\n", &fixed_clock());

        let archive = log_dir.path().join("errors.log.20240501_123045");
        assert_eq!(
            outcome.rotation.expect("rotation succeeds"),
            RotationOutcome::Rotated {
                archive: archive.clone()
            }
        );
        assert_eq!(read_to_string(&archive).expect("read"), "0123456789\n");
        assert_eq!(read_to_string(&path).expect("read"), "next\n");
    }

    #[rstest]
    fn colliding_archive_names_gain_a_counter(log_dir: TempDir) {
        let path = log_dir.path().join("server.log");
        let stream = LogStream::open(StreamKind::Server, &path, 4).expect("open stream");

        stream.append("aaaaaaaa\n", &fixed_clock());
        stream.append("bbbbbbbb\n", &fixed_clock());
        stream.append("cccccccc\n", &fixed_clock());

        let first = log_dir.path().join("server.log.20240501_123045");
        let second = log_dir.path().join("server.log.20240501_123045.1");
        assert_eq!(read_to_string(&first).expect("read"), "aaaaaaaa\n");
        assert_eq!(read_to_string(&second).expect("read"), "bbbbbbbb\n");
        assert_eq!(read_to_string(&path).expect("read"), "cccccccc\n");
    }

    #[rstest]
    fn exhausted_archive_names_fail_without_overwriting(log_dir: TempDir) {
        let path = log_dir.path().join("server.log");
        let base = log_dir.path().join("server.log.20240501_123045");
        fs::write(&base, "archived\n").expect("seed archive");
        for index in 1..MAX_ARCHIVE_COLLISIONS {
            let taken = log_dir.path().join(format!("server.log.20240501_123045.{index}"));
            fs::write(taken, format!("archived {index}\n")).expect("seed archive");
        }
        let stream = LogStream::open(StreamKind::Server, &path, 4).expect("open stream");
        stream.append("oversized\n", &fixed_clock());

        let error = stream.rotate(&fixed_clock()).expect_err("no archive name left");

        assert!(matches!(error, JournalError::Rotate { .. }));
        let last = log_dir.path().join("server.log.20240501_123045.999");
        assert_eq!(read_to_string(&last).expect("read"), "archived 999\n");
        assert!(!log_dir.path().join("server.log.20240501_123045.1000").exists());

        let outcome = stream.append("kept\n", &fixed_clock());
        assert!(outcome.rotation.is_err());
        assert!(outcome.written.is_ok());
        assert_eq!(read_to_string(&path).expect("read"), "oversized\nkept\n");
    }

    #[rstest]
    fn writer_reopens_after_live_file_disappears(log_dir: TempDir) {
        let path = log_dir.path().join("server.log");
        let stream = LogStream::open(StreamKind::Server, &path, 1024).expect("open stream");
        {
            let mut writer = stream.lock();
            *writer = None;
        }

        let outcome = stream.append("recovered\n", &fixed_clock());

        assert!(outcome.written.is_ok());
        assert_eq!(read_to_string(&path).expect("read"), "recovered\n");
    }
}
