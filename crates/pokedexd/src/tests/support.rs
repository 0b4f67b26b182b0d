//! Test doubles and harnesses shared by the server suites.

use std::collections::{HashSet, VecDeque};
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use pokedex_config::{Config, LogPaths};
use pokedex_domain::{DomainError, DomainOperations};
use tempfile::TempDir;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use crate::bootstrap::BootstrapError;
use crate::dispatch::{RequestHandler, Response};
use crate::health::HealthReporter;
use crate::journal::{Journal, StreamKind, read_to_string};
use crate::server::{Server, ShutdownReason};
use crate::transport::LineTransport;

/// One call made against [`RecordingDomain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainCall {
    Lookup(String),
    Compare(Vec<String>),
    Strategy(String),
    Team(String),
}

#[derive(Debug, Clone, Copy, Default)]
enum Behaviour {
    #[default]
    Succeed,
    Fail,
    Panic,
}

/// Domain double that records calls and answers with canned text.
///
/// Successful reports take the form `<operation>:<argument>`.
#[derive(Debug, Default)]
pub struct RecordingDomain {
    calls: Mutex<Vec<DomainCall>>,
    unknown: HashSet<String>,
    behaviour: Behaviour,
}

impl RecordingDomain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails with an HTTP 503 status error.
    pub fn failing() -> Self {
        Self {
            behaviour: Behaviour::Fail,
            ..Self::default()
        }
    }

    /// Every operation panics.
    pub fn panicking() -> Self {
        Self {
            behaviour: Behaviour::Panic,
            ..Self::default()
        }
    }

    /// Lookups of `name` resolve to nothing.
    pub fn with_unknown(mut self, name: &str) -> Self {
        self.unknown.insert(name.to_owned());
        self
    }

    pub fn calls(&self) -> Vec<DomainCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: DomainCall, operation: &str) -> Result<(), DomainError> {
        self.calls.lock().expect("calls mutex poisoned").push(call);
        match self.behaviour {
            Behaviour::Succeed => Ok(()),
            Behaviour::Fail => Err(DomainError::Status {
                url: format!("test://{operation}"),
                status: 503,
            }),
            Behaviour::Panic => panic!("{operation} exploded"),
        }
    }
}

impl DomainOperations for RecordingDomain {
    async fn lookup(&self, name: &str) -> Result<Option<String>, DomainError> {
        self.record(DomainCall::Lookup(name.to_owned()), "lookup")?;
        if self.unknown.contains(name) {
            return Ok(None);
        }
        Ok(Some(format!("lookup:{name}")))
    }

    async fn compare(&self, names: &[String]) -> Result<String, DomainError> {
        self.record(DomainCall::Compare(names.to_vec()), "compare")?;
        Ok(format!("compare:{}", names.join(",")))
    }

    async fn analyze_matchups(&self, name: &str) -> Result<String, DomainError> {
        self.record(DomainCall::Strategy(name.to_owned()), "analyze_matchups")?;
        Ok(format!("strategy:{name}"))
    }

    async fn suggest_team(&self, description: &str) -> Result<String, DomainError> {
        self.record(DomainCall::Team(description.to_owned()), "suggest_team")?;
        Ok(format!("team:{description}"))
    }
}

/// A journal writing into a temporary directory.
pub struct JournalHarness {
    dir: TempDir,
    journal: Arc<Journal>,
}

impl JournalHarness {
    pub fn new() -> Self {
        Self::with_threshold(5 * 1024 * 1024)
    }

    pub fn with_threshold(threshold: u64) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let paths = LogPaths::in_directory(dir.path()).expect("log paths");
        let journal = Arc::new(Journal::open(&paths, threshold).expect("open journal"));
        Self { dir, journal }
    }

    pub fn journal(&self) -> Arc<Journal> {
        Arc::clone(&self.journal)
    }

    pub fn contents(&self, kind: StreamKind) -> String {
        read_to_string(self.journal.path(kind)).expect("read stream")
    }

    /// Archived files of `kind`, sorted by name.
    pub fn archives(&self, kind: StreamKind) -> Vec<PathBuf> {
        let prefix = self
            .journal
            .path(kind)
            .file_name()
            .map(|name| format!("{}.", name.to_string_lossy()))
            .expect("stream file name");
        let mut archives: Vec<_> = std::fs::read_dir(self.dir.path())
            .expect("list log dir")
            .map(|entry| entry.expect("dir entry").path())
            .filter(|path| {
                path.file_name()
                    .is_some_and(|name| name.to_string_lossy().starts_with(&prefix))
            })
            .collect();
        archives.sort();
        archives
    }
}

/// Runs a whole session over in-memory input and returns the parsed
/// response lines and the shutdown reason.
pub async fn run_session<D>(
    domain: D,
    journal: Arc<Journal>,
    input: &str,
) -> (Vec<Response>, ShutdownReason)
where
    D: DomainOperations,
{
    let transport = LineTransport::new(io::Cursor::new(input.as_bytes().to_vec()), Vec::new());
    let mut server = Server::new(transport, RequestHandler::new(domain, journal));
    let reason = server.run().await;
    let output = String::from_utf8(server.transport().writer().clone()).expect("utf8 output");
    let responses = output
        .lines()
        .map(|line| serde_json::from_str(line).expect("response line is JSON"))
        .collect();
    (responses, reason)
}

/// Observable step of a scripted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoEvent {
    /// The server pulled the given input line.
    Read(String),
    /// The server saw end of input.
    ReadEof,
    /// The server flushed the given output.
    Flush(String),
}

pub type EventLog = Arc<Mutex<Vec<IoEvent>>>;

/// Input that yields one line per read and logs each read.
pub struct ScriptedInput {
    lines: VecDeque<String>,
    events: EventLog,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I, events: EventLog) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            events,
        }
    }
}

impl AsyncRead for ScriptedInput {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let event = match self.lines.pop_front() {
            Some(line) => {
                buf.put_slice(format!("{line}\n").as_bytes());
                IoEvent::Read(line)
            }
            None => IoEvent::ReadEof,
        };
        self.events.lock().expect("event log poisoned").push(event);
        Poll::Ready(Ok(()))
    }
}

/// Output that logs every flush together with the bytes written since the
/// previous one.
pub struct RecordingOutput {
    pending: Vec<u8>,
    events: EventLog,
}

impl RecordingOutput {
    pub fn new(events: EventLog) -> Self {
        Self {
            pending: Vec::new(),
            events,
        }
    }
}

impl AsyncWrite for RecordingOutput {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.pending.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let written = String::from_utf8(std::mem::take(&mut self.pending)).expect("utf8 output");
        self.events
            .lock()
            .expect("event log poisoned")
            .push(IoEvent::Flush(written));
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Output whose writes always fail with a broken pipe.
pub struct ClosedOutput;

impl AsyncWrite for ClosedOutput {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::from(io::ErrorKind::BrokenPipe)))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Lifecycle events captured by [`RecordingHealthReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    ServerStarting,
    ServerReady,
    ServerStopping(ShutdownReason),
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn server_starting(&self) {
        self.record(HealthEvent::ServerStarting);
    }

    fn server_ready(&self) {
        self.record(HealthEvent::ServerReady);
    }

    fn server_stopping(&self, reason: ShutdownReason) {
        self.record(HealthEvent::ServerStopping(reason));
    }
}
