//! Layered configuration for the Pokédex command server.
//!
//! Values are resolved by [`ortho_config`] in increasing precedence: built-in
//! defaults, a TOML file named by `--config-path` or `POKEDEX_CONFIG_PATH`,
//! `POKEDEX_*` environment variables, and finally command-line flags.
//!
//! The server only needs a handful of knobs: where the journal lives and when
//! it rotates, how the console sink renders, and how to reach PokeAPI.

mod defaults;
mod logging;
mod paths;

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub use defaults::{
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LOG_DIR, DEFAULT_LOG_FILTER,
    DEFAULT_ROTATION_THRESHOLD_BYTES, default_api_base_url, default_http_timeout_secs,
    default_log_dir, default_log_filter_string, default_log_format,
    default_rotation_threshold_bytes,
};
pub use logging::LogFormat;
pub use paths::{ERROR_LOG_FILE, LogPaths, LogPathsError, QUERY_LOG_FILE, SERVER_LOG_FILE};

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "POKEDEX")]
pub struct Config {
    /// Directory holding `server.log`, `queries.log` and `errors.log`.
    #[ortho_config(default = default_log_dir())]
    pub log_dir: Utf8PathBuf,
    /// Journal files larger than this many bytes are archived.
    #[ortho_config(default = DEFAULT_ROTATION_THRESHOLD_BYTES)]
    pub rotation_threshold_bytes: u64,
    /// `tracing` filter expression for the console sink.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Rendering of the console sink.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Base URL of the PokeAPI deployment to query.
    #[ortho_config(default = default_api_base_url())]
    pub api_base_url: String,
    /// Timeout applied to each outbound PokeAPI request.
    #[ortho_config(default = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            rotation_threshold_bytes: default_rotation_threshold_bytes(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            api_base_url: default_api_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Config {
    /// Directory holding the journal files.
    #[must_use]
    pub fn log_dir(&self) -> &Utf8Path {
        self.log_dir.as_path()
    }

    /// Size threshold above which a journal file is rotated.
    #[must_use]
    pub fn rotation_threshold_bytes(&self) -> u64 {
        self.rotation_threshold_bytes
    }

    /// Console log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Console log format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Per-request timeout for PokeAPI calls.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Parses the configured PokeAPI base URL.
    ///
    /// A trailing slash is appended when missing so that relative joins keep
    /// the final path segment (`.../api/v2/` + `pokemon/ditto`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiBaseUrl`] when the value is not an
    /// absolute `http` or `https` URL.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.api_base_url.trim();
        let normalised = if raw.ends_with('/') {
            raw.to_owned()
        } else {
            format!("{raw}/")
        };
        let url = Url::parse(&normalised).map_err(|source| ConfigError::InvalidApiBaseUrl {
            value: self.api_base_url.clone(),
            reason: source.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidApiBaseUrl {
                value: self.api_base_url.clone(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }
}

/// Errors raised while interpreting configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The PokeAPI base URL could not be used.
    #[error("invalid api_base_url '{value}': {reason}")]
    InvalidApiBaseUrl {
        /// Value as configured.
        value: String,
        /// Parser or validation failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.log_dir(), Utf8Path::new("logs"));
        assert_eq!(config.rotation_threshold_bytes(), 5 * 1024 * 1024);
        assert_eq!(config.log_filter(), "info");
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[rstest]
    #[case("https://pokeapi.co/api/v2", "https://pokeapi.co/api/v2/")]
    #[case("https://pokeapi.co/api/v2/", "https://pokeapi.co/api/v2/")]
    #[case("  http://127.0.0.1:8080  ", "http://127.0.0.1:8080/")]
    fn normalises_api_base_url(#[case] raw: &str, #[case] expected: &str) {
        let config = Config {
            api_base_url: raw.to_owned(),
            ..Config::default()
        };
        let url = config.api_base_url().expect("valid base url");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://pokeapi.co/api/v2")]
    fn rejects_unusable_api_base_url(#[case] raw: &str) {
        let config = Config {
            api_base_url: raw.to_owned(),
            ..Config::default()
        };
        assert!(matches!(
            config.api_base_url(),
            Err(ConfigError::InvalidApiBaseUrl { .. })
        ));
    }
}
