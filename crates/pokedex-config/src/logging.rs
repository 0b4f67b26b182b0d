//! Console sink rendering options.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Output format of the console sink.
///
/// The durable journal files always use the plain line format; this only
/// selects how `tracing` renders the mirrored console events on stderr.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, for log shippers.
    Json,
    /// Human-readable single line output, matching the journal files.
    #[default]
    Compact,
}
