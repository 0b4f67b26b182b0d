//! Record layout for the three journal streams.

use std::error::Error;
use std::fmt::Write as _;
use std::panic::Location;

use strum::{Display, EnumString};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// Severity attached to server-stream records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Severity {
    /// Diagnostic detail.
    Debug,
    /// Routine activity.
    #[default]
    Info,
    /// Recoverable problem.
    Warning,
    /// Failed operation.
    Error,
    /// Failure threatening the whole process.
    Critical,
}

/// The three durable streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StreamKind {
    /// Lifecycle and activity records.
    Server,
    /// One record per accepted query.
    Queries,
    /// Failures with their trace block.
    Errors,
}

impl StreamKind {
    /// All streams in rotation order.
    pub const ALL: [Self; 3] = [Self::Server, Self::Queries, Self::Errors];
}

/// Formats `now` as an RFC 3339 timestamp.
pub(crate) fn timestamp(now: OffsetDateTime) -> String {
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// Formats `now` as an archive suffix (`YYYYMMDD_HHMMSS`).
pub(crate) fn archive_suffix(now: OffsetDateTime) -> String {
    let layout = format_description!("[year][month][day]_[hour][minute][second]");
    now.format(&layout)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// Text of a queries-stream record, without timestamp.
pub(crate) fn query_message(query: &str, user: Option<&str>) -> String {
    match user {
        Some(user) => format!("User: {user} - Query: {query}"),
        None => format!("Query: {query}"),
    }
}

/// Text of an errors-stream record, without timestamp or trace block.
pub(crate) fn error_message(error: &dyn Error, context: Option<&str>) -> String {
    match context {
        Some(context) => format!("{context} - Error: {error}"),
        None => format!("Error: {error}"),
    }
}

/// Indented trace block: the reporting location followed by the source chain.
pub(crate) fn trace_block(error: &dyn Error, location: &Location<'_>) -> String {
    let mut block = format!(
        "  at {}:{}:{}\n",
        location.file(),
        location.line(),
        location.column()
    );
    let mut source = error.source();
    while let Some(cause) = source {
        writeln!(block, "  caused by: {}", single_line(&cause.to_string()))
            .unwrap_or_default();
        source = cause.source();
    }
    block
}

/// Complete line for the server or errors stream.
pub(crate) fn leveled_line(now: OffsetDateTime, severity: Severity, message: &str) -> String {
    format!("{} - {severity} - {}\n", timestamp(now), single_line(message))
}

/// Complete line for the queries stream.
pub(crate) fn plain_line(now: OffsetDateTime, message: &str) -> String {
    format!("{} - {}\n", timestamp(now), single_line(message))
}

/// Escapes line breaks so one record stays on one line.
pub(crate) fn single_line(message: &str) -> String {
    if !message.contains(['\n', '\r']) {
        return message.to_owned();
    }
    message.replace('\r', "\\r").replace('\n', "\\n")
}
