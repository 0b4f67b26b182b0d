//! The capability surface the command server dispatches to.

use std::future::Future;
use std::sync::Arc;

use crate::DomainError;

/// The four capabilities the command server can dispatch to.
///
/// Every operation may take unbounded time because implementations are free
/// to perform outbound network calls. Arguments arrive lower-cased.
pub trait DomainOperations: Send + Sync {
    /// Looks up a single creature; `None` when the name does not resolve.
    fn lookup(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, DomainError>> + Send;

    /// Compares two creatures named somewhere in `names`.
    ///
    /// The whole token list is handed over so the implementation can skip
    /// filler words such as `vs` or `and`.
    fn compare(&self, names: &[String])
    -> impl Future<Output = Result<String, DomainError>> + Send;

    /// Reports type weaknesses and counter-strategies for a creature.
    fn analyze_matchups(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<String, DomainError>> + Send;

    /// Suggests a team from a free-text description.
    fn suggest_team(
        &self,
        description: &str,
    ) -> impl Future<Output = Result<String, DomainError>> + Send;
}

impl<T> DomainOperations for Arc<T>
where
    T: DomainOperations,
{
    fn lookup(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, DomainError>> + Send {
        (**self).lookup(name)
    }

    fn compare(
        &self,
        names: &[String],
    ) -> impl Future<Output = Result<String, DomainError>> + Send {
        (**self).compare(names)
    }

    fn analyze_matchups(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<String, DomainError>> + Send {
        (**self).analyze_matchups(name)
    }

    fn suggest_team(
        &self,
        description: &str,
    ) -> impl Future<Output = Result<String, DomainError>> + Send {
        (**self).suggest_team(description)
    }
}
