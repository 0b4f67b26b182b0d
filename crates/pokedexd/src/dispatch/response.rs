//! Response envelope for the line protocol.
//!
//! Every request line is answered with exactly one JSON object carrying a
//! single member: `response` on success or `error` on failure.

use serde::{Deserialize, Serialize};

use super::errors::DispatchError;

/// One response line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// `{"response": text}`
    #[serde(rename = "response")]
    Success(String),
    /// `{"error": text}`
    #[serde(rename = "error")]
    Failure(String),
}

impl Response {
    /// Creates a success response.
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success(text.into())
    }

    /// Creates an error response.
    pub fn failure(text: impl Into<String>) -> Self {
        Self::Failure(text.into())
    }

    /// Creates the error response the client sees for `error`.
    #[must_use]
    pub fn from_error(error: &DispatchError) -> Self {
        Self::Failure(error.client_message())
    }

    /// Whether this is a success response.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The carried text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    /// Serialises the response as one newline-terminated line.
    ///
    /// Embedded newlines in the text are escaped by the JSON encoder, so the
    /// result never spans more than one line.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Internal`] if serialisation fails.
    pub fn to_line(&self) -> Result<String, DispatchError> {
        let mut line = serde_json::to_string(self).map_err(|error| {
            DispatchError::internal(format!("failed to serialize response: {error}"))
        })?;
        line.push('\n');
        Ok(line)
    }
}
