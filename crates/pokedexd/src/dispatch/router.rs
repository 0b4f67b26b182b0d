//! Command routing onto the domain operations.
//!
//! The router parses a query into a [`Command`] and performs exactly one
//! domain call for it. Queries that do not parse never reach the domain.

use pokedex_domain::DomainOperations;
use pokedex_domain::report::not_found_report;
use tracing::debug;

use super::command::Command;
use super::errors::DispatchError;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Routes parsed commands to a [`DomainOperations`] implementation.
#[derive(Debug)]
pub struct CommandRouter<D> {
    domain: D,
}

impl<D> CommandRouter<D>
where
    D: DomainOperations,
{
    /// Creates a router over `domain`.
    pub fn new(domain: D) -> Self {
        Self { domain }
    }

    /// Domain operations the router dispatches to.
    pub fn domain(&self) -> &D {
        &self.domain
    }

    /// Parses `query` and runs the matching domain operation.
    ///
    /// A lookup that finds nothing is answered with an explanatory report
    /// rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidCommand`] for unrecognised queries and
    /// [`DispatchError::DomainFailure`] when the domain operation fails.
    pub async fn dispatch(&self, query: &str) -> Result<String, DispatchError> {
        let command = Command::parse(query)?;

        debug!(
            target: DISPATCH_TARGET,
            command = command.keyword(),
            "routing command"
        );

        self.execute(command).await
    }

    async fn execute(&self, command: Command) -> Result<String, DispatchError> {
        let report = match command {
            Command::Lookup { name } => self
                .domain
                .lookup(&name)
                .await?
                .unwrap_or_else(|| not_found_report(&name)),
            Command::Compare { names } => self.domain.compare(&names).await?,
            Command::Strategy { name } => self.domain.analyze_matchups(&name).await?,
            Command::Team { description } => self.domain.suggest_team(&description).await?,
        };
        Ok(report)
    }
}
