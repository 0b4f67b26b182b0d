//! Thin HTTP client for the PokeAPI resources used by the reports.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::DomainError;
use crate::model::{ElementType, Pokemon};

/// User agent sent with every request.
pub const USER_AGENT: &str = "pokemon-app/1.0";

const CLIENT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::client");

/// HTTP client bound to one PokeAPI deployment.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PokeApiClient {
    /// Builds a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBaseUrl`] when the URL cannot carry path
    /// segments and [`DomainError::Client`] when the TLS backend fails to
    /// initialise.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, DomainError> {
        if base_url.cannot_be_a_base() {
            return Err(DomainError::InvalidBaseUrl {
                url: base_url.to_string(),
            });
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| DomainError::Client { source })?;
        Ok(Self { http, base_url })
    }

    /// Fetches a creature by name; `None` when PokeAPI does not know it.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] for transport failures, unexpected statuses
    /// and undecodable bodies.
    pub async fn pokemon(&self, name: &str) -> Result<Option<Pokemon>, DomainError> {
        self.fetch("pokemon", name).await
    }

    /// Fetches a type's damage relations; `None` when the type is unknown.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] for transport failures, unexpected statuses
    /// and undecodable bodies.
    pub async fn element_type(&self, name: &str) -> Result<Option<ElementType>, DomainError> {
        self.fetch("type", name).await
    }

    /// Builds `{base}/{resource}/{slug}` with the slug percent-encoded as a
    /// single path segment.
    pub fn resource_url(&self, resource: &str, name: &str) -> Result<Url, DomainError> {
        let slug = slug(name);
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| DomainError::InvalidBaseUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .push(resource)
            .push(&slug);
        Ok(url)
    }

    async fn fetch<T>(&self, resource: &str, name: &str) -> Result<Option<T>, DomainError>
    where
        T: DeserializeOwned,
    {
        let url = self.resource_url(resource, name)?;
        debug!(target: CLIENT_TARGET, %url, "requesting resource");

        let response = self
            .http
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| DomainError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(target: CLIENT_TARGET, %url, "resource not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DomainError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|source| DomainError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

/// Normalises free text into a PokeAPI slug (`Mr Mime` -> `mr-mime`).
#[must_use]
pub fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
