//! Structured health reporting for server lifecycle events.

use std::sync::Arc;

use pokedex_config::Config;

use crate::bootstrap::BootstrapError;
use crate::journal::{Journal, Severity};
use crate::server::ShutdownReason;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked before the server loop is assembled.
    fn server_starting(&self);

    /// Invoked once the server is waiting for requests.
    fn server_ready(&self);

    /// Invoked when the server loop ends.
    fn server_stopping(&self, reason: ShutdownReason);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn server_starting(&self) {
        (**self).server_starting();
    }

    fn server_ready(&self) {
        (**self).server_ready();
    }

    fn server_stopping(&self, reason: ShutdownReason) {
        (**self).server_stopping(reason);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting server bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            log_dir = %config.log_dir(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            api_base_url = %config.api_base_url,
            "server bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "server bootstrap failed"
        );
    }

    fn server_starting(&self) {
        tracing::info!(target: HEALTH_TARGET, event = "server_starting", "starting server");
    }

    fn server_ready(&self) {
        tracing::info!(target: HEALTH_TARGET, event = "server_ready", "server ready");
    }

    fn server_stopping(&self, reason: ShutdownReason) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "server_stopping",
            reason = %reason,
            "server stopping"
        );
    }
}

/// Reporter that records lifecycle events on the journal's server stream
/// and forwards them to an inner reporter.
///
/// Journal records are mirrored to the console already, so the inner
/// reporter is usually a test double or [`StructuredHealthReporter`] kept
/// for its structured fields.
pub struct JournalHealthReporter {
    journal: Arc<Journal>,
    inner: Arc<dyn HealthReporter>,
}

impl JournalHealthReporter {
    /// Wraps `inner`, additionally journaling every event.
    pub fn new(journal: Arc<Journal>, inner: Arc<dyn HealthReporter>) -> Self {
        Self { journal, inner }
    }
}

impl HealthReporter for JournalHealthReporter {
    fn bootstrap_starting(&self) {
        self.inner.bootstrap_starting();
        self.journal
            .log_activity("Starting server bootstrap", Severity::Debug);
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        self.inner.bootstrap_succeeded(config);
        self.journal.log_activity(
            &format!("Configuration loaded; logging to {}", config.log_dir()),
            Severity::Info,
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.inner.bootstrap_failed(error);
        self.journal
            .log_activity(&format!("Server bootstrap failed: {error}"), Severity::Critical);
    }

    fn server_starting(&self) {
        self.inner.server_starting();
        self.journal
            .log_activity("Starting Pokédex server", Severity::Info);
    }

    fn server_ready(&self) {
        self.inner.server_ready();
        self.journal
            .log_activity("Server ready; waiting for requests", Severity::Info);
    }

    fn server_stopping(&self, reason: ShutdownReason) {
        self.inner.server_stopping(reason);
        self.journal
            .log_activity(&format!("Server shutting down: {reason}"), Severity::Info);
    }
}
