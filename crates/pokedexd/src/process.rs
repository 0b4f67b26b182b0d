//! Process entry point: bootstrap, serve stdio, stop on interrupt.

use std::sync::Arc;

use pokedex_domain::PokeApi;
use tokio::io;
use tracing::warn;

use crate::bootstrap::{BootstrapError, SystemConfigLoader, bootstrap_with};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::server::ShutdownReason;

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Runs the server over the process's stdin and stdout.
///
/// Configuration comes from defaults, an optional file, `POKEDEX_*`
/// environment variables and command-line flags. The server stops when stdin
/// closes, stdout goes away or the process receives Ctrl-C.
///
/// # Errors
///
/// Returns [`BootstrapError`] when the server could not be started.
pub async fn run_server() -> Result<ShutdownReason, BootstrapError> {
    let reporter: Arc<dyn HealthReporter> = Arc::new(StructuredHealthReporter::new());
    let daemon = bootstrap_with(&SystemConfigLoader, reporter, PokeApi::from_config)?;
    Ok(daemon
        .serve_until(io::stdin(), io::stdout(), interrupted())
        .await)
}

/// Completes on Ctrl-C. Never completes if the handler cannot be installed.
async fn interrupted() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(target: PROCESS_TARGET, %error, "failed to listen for interrupts");
        std::future::pending::<()>().await;
    }
}
