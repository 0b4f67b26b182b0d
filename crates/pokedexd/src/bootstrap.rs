//! Server bootstrap orchestration.

use std::future::{self, Future};
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

use pokedex_config::{Config, LogPaths, LogPathsError};
use pokedex_domain::{DomainError, DomainOperations};

use crate::dispatch::RequestHandler;
use crate::health::{HealthReporter, JournalHealthReporter};
use crate::journal::{Journal, JournalError};
use crate::server::{Server, ShutdownReason};
use crate::telemetry::{self, TelemetryError};
use crate::transport::LineTransport;

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the server configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader returning a configuration resolved elsewhere.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already-resolved configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The log directory could not be prepared.
    #[error("failed to prepare log directory: {source}")]
    LogDirectory {
        /// Filesystem error reported while creating the directory.
        #[source]
        source: LogPathsError,
    },
    /// A journal stream could not be opened.
    #[error("failed to open journal: {source}")]
    Journal {
        /// Underlying journal error.
        #[source]
        source: JournalError,
    },
    /// The domain implementation could not be built.
    #[error("failed to initialise domain operations: {source}")]
    Domain {
        /// Underlying domain error.
        #[source]
        source: DomainError,
    },
}

/// Result of a successful bootstrap invocation.
pub struct Daemon<D> {
    config: Config,
    journal: Arc<Journal>,
    domain: Arc<D>,
    reporter: Arc<dyn HealthReporter>,
}

impl<D> Daemon<D> {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared journal.
    #[must_use]
    pub fn journal(&self) -> &Arc<Journal> {
        &self.journal
    }

    /// Domain operations served by this daemon.
    #[must_use]
    pub fn domain(&self) -> &Arc<D> {
        &self.domain
    }
}

impl<D> Daemon<D>
where
    D: DomainOperations,
{
    /// Serves requests from `reader` until the input closes.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> ShutdownReason
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.serve_until(reader, writer, future::pending()).await
    }

    /// Serves requests until the input closes or `shutdown` completes.
    ///
    /// A request in flight when `shutdown` completes is abandoned.
    pub async fn serve_until<R, W, S>(&self, reader: R, writer: W, shutdown: S) -> ShutdownReason
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        self.reporter.server_starting();
        let handler = RequestHandler::new(Arc::clone(&self.domain), Arc::clone(&self.journal));
        let mut server = Server::new(LineTransport::new(reader, writer), handler);
        self.reporter.server_ready();

        let reason = tokio::select! {
            reason = server.run() => reason,
            () = shutdown => ShutdownReason::Interrupted,
        };

        self.reporter.server_stopping(reason);
        reason
    }
}

/// Bootstraps the server using the supplied collaborators.
///
/// Loads configuration, installs console telemetry, opens the journal and
/// builds the domain implementation with `build_domain`. Once the journal is
/// open, lifecycle events are also recorded on its server stream.
///
/// # Errors
///
/// Returns the [`BootstrapError`] of the first step that failed; the
/// reporter is told about it before returning.
pub fn bootstrap_with<D, F>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    build_domain: F,
) -> Result<Daemon<D>, BootstrapError>
where
    F: FnOnce(&Config) -> Result<D, DomainError>,
{
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => return Err(fail(&*reporter, BootstrapError::Configuration { source })),
    };

    if let Err(source) = telemetry::initialise(&config) {
        return Err(fail(&*reporter, BootstrapError::Telemetry { source }));
    }

    let paths = match LogPaths::from_config(&config) {
        Ok(paths) => paths,
        Err(source) => return Err(fail(&*reporter, BootstrapError::LogDirectory { source })),
    };

    let journal = match Journal::open(&paths, config.rotation_threshold_bytes()) {
        Ok(journal) => Arc::new(journal),
        Err(source) => return Err(fail(&*reporter, BootstrapError::Journal { source })),
    };

    let reporter: Arc<dyn HealthReporter> =
        Arc::new(JournalHealthReporter::new(Arc::clone(&journal), reporter));

    let domain = match build_domain(&config) {
        Ok(domain) => Arc::new(domain),
        Err(source) => return Err(fail(&*reporter, BootstrapError::Domain { source })),
    };

    reporter.bootstrap_succeeded(&config);

    Ok(Daemon {
        config,
        journal,
        domain,
        reporter,
    })
}

fn fail(reporter: &dyn HealthReporter, error: BootstrapError) -> BootstrapError {
    reporter.bootstrap_failed(&error);
    error
}
