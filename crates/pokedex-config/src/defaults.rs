//! Built-in configuration defaults.

use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Directory holding the three journal files when nothing else is configured.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Size above which a journal file is archived (5 MiB).
pub const DEFAULT_ROTATION_THRESHOLD_BYTES: u64 = 5 * 1024 * 1024;

/// Default console log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Base URL of the public PokeAPI.
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Per-request timeout for outbound PokeAPI calls.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default journal directory.
pub fn default_log_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_LOG_DIR)
}

/// Default rotation threshold in bytes.
pub fn default_rotation_threshold_bytes() -> u64 {
    DEFAULT_ROTATION_THRESHOLD_BYTES
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default console log format.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default PokeAPI base URL.
pub fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_owned()
}

/// Default outbound HTTP timeout in seconds.
pub fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}
