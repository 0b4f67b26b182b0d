//! Request decoding and validation.
//!
//! A request line is a JSON object with a required string `query` and an
//! optional string `user`. Other members are ignored.

use serde_json::Value;

use super::errors::DispatchError;

/// User recorded when a request does not name one.
pub const UNKNOWN_USER: &str = "unknown";

/// A request that passed shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    query: String,
    user: Option<String>,
}

impl QueryRequest {
    /// Decodes one input line into a JSON value.
    ///
    /// Surrounding whitespace (including the newline delimiter) is trimmed
    /// before parsing. Invalid UTF-8 is reported like any other malformed
    /// JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedInput`] when the line is not JSON.
    pub fn decode(line: &[u8]) -> Result<Value, DispatchError> {
        serde_json::from_slice(line.trim_ascii()).map_err(DispatchError::from_json_error)
    }

    /// Validates the minimal request shape.
    ///
    /// Checks run in order and stop at the first failure: the value must be
    /// an object, it must contain `query`, and `query` must be a string. An
    /// empty query passes; see [`QueryRequest::require_query`].
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedRequest`],
    /// [`DispatchError::MissingField`] or [`DispatchError::TypeMismatch`].
    pub fn from_value(value: &Value) -> Result<Self, DispatchError> {
        let object = value.as_object().ok_or(DispatchError::MalformedRequest)?;
        let query = object.get("query").ok_or(DispatchError::MissingField)?;
        let query = query.as_str().ok_or(DispatchError::TypeMismatch)?;
        let user = object.get("user").and_then(Value::as_str);

        Ok(Self {
            query: query.to_owned(),
            user: user.map(str::to_owned),
        })
    }

    /// The query with surrounding whitespace removed.
    #[must_use]
    pub fn query(&self) -> &str {
        self.query.trim()
    }

    /// The requesting user, or [`UNKNOWN_USER`].
    #[must_use]
    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(UNKNOWN_USER)
    }

    /// The trimmed query, rejecting one that is empty.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::EmptyQuery`] for empty or whitespace-only
    /// queries.
    pub fn require_query(&self) -> Result<&str, DispatchError> {
        let query = self.query();
        if query.is_empty() {
            return Err(DispatchError::EmptyQuery);
        }
        Ok(query)
    }
}
