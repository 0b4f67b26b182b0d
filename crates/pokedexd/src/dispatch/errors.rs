//! Error types for request validation and dispatch failures.
//!
//! Every variant renders the text placed in an `{"error": ...}` response via
//! [`DispatchError::client_message`]. None of them is fatal to the server
//! loop; only stream closure ends it.

use std::io;

use pokedex_domain::DomainError;
use thiserror::Error;

use super::command::VALID_COMMANDS;

/// Client message used for faults the client cannot act upon.
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Errors surfaced while turning an input line into a response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The line is not valid UTF-8 JSON.
    #[error("Invalid JSON format: {message}")]
    MalformedInput {
        /// Parser diagnostic.
        message: String,
        /// Underlying parser error, if any.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The decoded value is not a JSON object.
    #[error("Request must be a JSON object")]
    MalformedRequest,

    /// The object carries no `query` member.
    #[error("Request must contain a 'query' field")]
    MissingField,

    /// The `query` member is not a string.
    #[error("Query must be a string")]
    TypeMismatch,

    /// The query is empty once surrounding whitespace is removed.
    #[error("No query provided")]
    EmptyQuery,

    /// The query does not match any of the four command forms.
    #[error("Invalid command. Valid commands are: {}", VALID_COMMANDS.join(", "))]
    InvalidCommand {
        /// First token of the query, empty when there was none.
        keyword: String,
    },

    /// A domain operation failed.
    #[error("{source}")]
    DomainFailure {
        /// Failure reported by the domain implementation.
        #[source]
        source: DomainError,
    },

    /// The input line exceeds the transport limit.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge {
        /// Bytes consumed for the rejected line.
        size: usize,
        /// Configured per-line limit.
        max_size: usize,
    },

    /// IO failure, serialization failure or a panicking domain future.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the fault.
        message: String,
        /// Underlying IO error, if any.
        #[source]
        source: Option<io::Error>,
    },
}

impl DispatchError {
    /// Creates a malformed input error from a serde error.
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedInput {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates an invalid command error for the offending keyword.
    pub fn invalid_command(keyword: impl Into<String>) -> Self {
        Self::InvalidCommand {
            keyword: keyword.into(),
        }
    }

    /// Creates an internal error with a custom message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Text for the `error` member of the response.
    ///
    /// Internal faults are collapsed to a generic message; everything else
    /// is reported verbatim.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal { .. } => INTERNAL_SERVER_ERROR.to_owned(),
            other => other.to_string(),
        }
    }

    /// Short name of the failure class, used as structured log context.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => "malformed_input",
            Self::MalformedRequest => "malformed_request",
            Self::MissingField => "missing_field",
            Self::TypeMismatch => "type_mismatch",
            Self::EmptyQuery => "empty_query",
            Self::InvalidCommand { .. } => "invalid_command",
            Self::DomainFailure { .. } => "domain_failure",
            Self::RequestTooLarge { .. } => "request_too_large",
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<DomainError> for DispatchError {
    fn from(source: DomainError) -> Self {
        Self::DomainFailure { source }
    }
}

impl From<io::Error> for DispatchError {
    fn from(source: io::Error) -> Self {
        Self::Internal {
            message: source.to_string(),
            source: Some(source),
        }
    }
}
