//! Pokédex command server.
//!
//! `pokedexd` reads JSON request objects from stdin, one per line, and
//! answers each with a single JSON response line on stdout. A query is one
//! of four commands (`get info`, `compare`, `strategy`, `team`) routed onto
//! the [`pokedex_domain::DomainOperations`] trait.
//!
//! Every step is recorded by the [`Journal`]: accepted queries on the
//! queries stream, activity and lifecycle on the server stream, failures
//! with their source chain on the errors stream. Each stream rotates once its
//! file outgrows the configured threshold. Console telemetry goes to stderr
//! through `tracing`.
//!
//! The loop is strictly sequential and never stops because of a bad request
//! or a failing domain call; only closure of stdin (or stdout) ends it.

mod bootstrap;
pub mod dispatch;
mod health;
pub mod journal;
mod process;
mod server;
mod telemetry;
pub mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, JournalHealthReporter, StructuredHealthReporter};
pub use journal::Journal;
pub use process::run_server;
pub use server::{Server, ShutdownReason};
pub use telemetry::TelemetryError;

#[cfg(test)]
mod tests;
