//! Per-line request handling.
//!
//! [`RequestHandler`] takes one raw input line through parsing, validation
//! and dispatch, journaling each step, and produces the response to write.
//! Failures never escape: every error, including a panicking domain future,
//! is logged and turned into an `{"error": ...}` response.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use pokedex_domain::DomainOperations;
use tracing::{debug, warn};

use crate::journal::{Journal, Severity};

use super::errors::DispatchError;
use super::request::QueryRequest;
use super::response::Response;
use super::router::{CommandRouter, DISPATCH_TARGET};

/// Error-stream context for lines that are not JSON.
const PARSE_CONTEXT: &str = "Error parsing request";
/// Error-stream context for requests with the wrong shape.
const VALIDATION_CONTEXT: &str = "Invalid request";

/// Turns input lines into responses.
#[derive(Debug)]
pub struct RequestHandler<D> {
    router: CommandRouter<D>,
    journal: Arc<Journal>,
}

impl<D> RequestHandler<D>
where
    D: DomainOperations,
{
    /// Creates a handler dispatching to `domain` and logging to `journal`.
    pub fn new(domain: D, journal: Arc<Journal>) -> Self {
        Self {
            router: CommandRouter::new(domain),
            journal,
        }
    }

    /// Shared journal.
    pub fn journal(&self) -> &Arc<Journal> {
        &self.journal
    }

    /// Handles one raw input line.
    ///
    /// Returns `None` for blank lines, which are skipped without a response
    /// or a log entry.
    pub async fn handle_line(&self, line: &[u8]) -> Option<Response> {
        if line.trim_ascii().is_empty() {
            return None;
        }

        let request = match self.parse(line) {
            Ok(request) => request,
            Err(response) => return Some(response),
        };

        let query = match request.require_query() {
            Ok(query) => query,
            Err(error) => return Some(self.reject(&error, VALIDATION_CONTEXT)),
        };

        Some(self.dispatch(query, request.user()).await)
    }

    fn parse(&self, line: &[u8]) -> Result<QueryRequest, Response> {
        let value =
            QueryRequest::decode(line).map_err(|error| self.reject(&error, PARSE_CONTEXT))?;
        QueryRequest::from_value(&value).map_err(|error| self.reject(&error, VALIDATION_CONTEXT))
    }

    async fn dispatch(&self, query: &str, user: &str) -> Response {
        self.journal.log_query(query, Some(user));
        self.journal
            .log_activity(&format!("Processing query: {query}"), Severity::Info);

        let outcome = AssertUnwindSafe(self.router.dispatch(query))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(panic_error(payload.as_ref())));

        match outcome {
            Ok(report) => {
                self.journal.log_activity(
                    &format!("Successfully processed query: {query}"),
                    Severity::Info,
                );
                debug!(target: DISPATCH_TARGET, "query processed");
                Response::success(report)
            }
            Err(error) => self.reject(&error, &format!("Error processing query: {query}")),
        }
    }

    #[track_caller]
    fn reject(&self, error: &DispatchError, context: &str) -> Response {
        warn!(target: DISPATCH_TARGET, kind = error.kind(), %error, "request failed");
        self.journal.log_error(error, Some(context));
        Response::from_error(error)
    }
}

fn panic_error(payload: &(dyn Any + Send)) -> DispatchError {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned());
    DispatchError::internal(format!("domain operation panicked: {detail}"))
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::journal::StreamKind;
    use crate::tests::support::{DomainCall, JournalHarness, RecordingDomain};

    struct Fixture {
        journal: JournalHarness,
        handler: RequestHandler<Arc<RecordingDomain>>,
        domain: Arc<RecordingDomain>,
    }

    impl Fixture {
        fn with_domain(domain: RecordingDomain) -> Self {
            let journal = JournalHarness::new();
            let domain = Arc::new(domain);
            let handler = RequestHandler::new(Arc::clone(&domain), journal.journal());
            Self {
                journal,
                handler,
                domain,
            }
        }
    }

    #[fixture]
    fn fixture() -> Fixture {
        Fixture::with_domain(RecordingDomain::new())
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"   ".as_slice())]
    #[case(b"\t\r\n".as_slice())]
    #[tokio::test]
    async fn blank_lines_are_skipped_silently(fixture: Fixture, #[case] line: &[u8]) {
        assert_eq!(fixture.handler.handle_line(line).await, None);
        assert!(fixture.journal.contents(StreamKind::Errors).is_empty());
        assert!(fixture.journal.contents(StreamKind::Queries).is_empty());
        assert!(fixture.journal.contents(StreamKind::Server).is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn successful_queries_are_journaled(fixture: Fixture) {
        let response = fixture
            .handler
            .handle_line(br#"{"query": "get info pikachu", "user": "ash"}"#)
            .await;

        assert_eq!(response, Some(Response::success("lookup:pikachu")));
        assert!(
            fixture
                .journal
                .contents(StreamKind::Queries)
                .ends_with(" - User: ash - Query: get info pikachu\n")
        );
        let server = fixture.journal.contents(StreamKind::Server);
        let lines: Vec<_> = server.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(
            lines
                .first()
                .is_some_and(|line| line.ends_with("INFO - Processing query: get info pikachu"))
        );
        assert!(lines.last().is_some_and(
            |line| line.ends_with("INFO - Successfully processed query: get info pikachu")
        ));
        assert!(fixture.journal.contents(StreamKind::Errors).is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_user_is_logged_as_unknown(fixture: Fixture) {
        fixture
            .handler
            .handle_line(br#"{"query": "team rain"}"#)
            .await;

        assert!(
            fixture
                .journal
                .contents(StreamKind::Queries)
                .ends_with(" - User: unknown - Query: team rain\n")
        );
    }

    #[rstest]
    #[case(br#"{"user": "ash"}"#.as_slice(), "Request must contain a 'query' field")]
    #[case(br#"{"query": 5}"#.as_slice(), "Query must be a string")]
    #[case(br#"["get info pikachu"]"#.as_slice(), "Request must be a JSON object")]
    #[case(br#"{"query": "   "}"#.as_slice(), "No query provided")]
    #[tokio::test]
    async fn invalid_requests_are_rejected_without_dispatch(
        fixture: Fixture,
        #[case] line: &[u8],
        #[case] expected: &str,
    ) {
        let response = fixture.handler.handle_line(line).await;

        assert_eq!(response, Some(Response::failure(expected)));
        assert!(fixture.domain.calls().is_empty());
        assert!(fixture.journal.contents(StreamKind::Queries).is_empty());
        assert!(
            fixture
                .journal
                .contents(StreamKind::Errors)
                .contains(&format!("ERROR - Invalid request - Error: {expected}"))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_json_reports_the_parser_detail(fixture: Fixture) {
        let response = fixture
            .handler
            .handle_line(b"{\"query\": ")
            .await
            .expect("response");

        assert!(!response.is_success());
        assert!(response.text().starts_with("Invalid JSON format: "));
        assert!(
            fixture
                .journal
                .contents(StreamKind::Errors)
                .contains("Error parsing request - Error: Invalid JSON format: ")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_commands_are_logged_with_the_query(fixture: Fixture) {
        let response = fixture
            .handler
            .handle_line(br#"{"query": "fly to cerulean"}"#)
            .await
            .expect("response");

        assert!(response.text().starts_with("Invalid command."));
        assert!(
            fixture
                .journal
                .contents(StreamKind::Errors)
                .contains("Error processing query: fly to cerulean - Error: Invalid command.")
        );
        assert!(fixture.domain.calls().is_empty());
    }

    #[tokio::test]
    async fn domain_failures_become_error_responses() {
        let fixture = Fixture::with_domain(RecordingDomain::failing());

        let response = fixture
            .handler
            .handle_line(br#"{"query": "strategy onix"}"#)
            .await
            .expect("response");

        assert_eq!(
            response,
            Response::failure("request to test://analyze_matchups returned HTTP 503")
        );
        assert_eq!(
            fixture.domain.calls(),
            vec![DomainCall::Strategy("onix".to_owned())]
        );
        assert!(
            !fixture
                .journal
                .contents(StreamKind::Server)
                .contains("Successfully processed")
        );
    }

    #[tokio::test]
    async fn panicking_domain_is_contained() {
        let fixture = Fixture::with_domain(RecordingDomain::panicking());

        let first = fixture
            .handler
            .handle_line(br#"{"query": "team anything"}"#)
            .await;
        let errors = fixture.journal.contents(StreamKind::Errors);

        assert_eq!(first, Some(Response::failure("Internal server error")));
        assert!(errors.contains("domain operation panicked: suggest_team exploded"));
    }

    #[rstest]
    #[tokio::test]
    async fn error_records_locate_the_failing_step(fixture: Fixture) {
        fixture.handler.handle_line(b"not json").await;
        fixture.handler.handle_line(br#"{"user": "ash"}"#).await;
        fixture
            .handler
            .handle_line(br#"{"query": "fly to cerulean"}"#)
            .await;

        let errors = fixture.journal.contents(StreamKind::Errors);
        let locations: Vec<&str> = errors
            .lines()
            .filter(|line| line.starts_with("  at "))
            .collect();
        assert_eq!(locations.len(), 3, "unexpected trace blocks: {errors}");
        assert!(locations.iter().all(|line| line.contains("handler.rs")));
        let distinct: std::collections::HashSet<_> = locations.iter().collect();
        assert_eq!(distinct.len(), 3, "locations collapse: {locations:?}");
    }
}
