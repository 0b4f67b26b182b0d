//! Failures raised by domain operations.

use thiserror::Error;

/// Exceptional failures of a domain operation.
///
/// Unknown names are reported in-band; these variants cover the conditions
/// the server loop has to catch and surface as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// Underlying builder error.
        #[source]
        source: reqwest::Error,
    },
    /// The configured base URL cannot carry path segments.
    #[error("base URL '{url}' cannot be used for API requests")]
    InvalidBaseUrl {
        /// Offending base URL.
        url: String,
    },
    /// The request did not complete.
    #[error("request to {url} failed: {source}")]
    Http {
        /// Requested URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The upstream answered with an unexpected status.
    #[error("request to {url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The response body did not match the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Underlying decode error.
        #[source]
        source: reqwest::Error,
    },
}
