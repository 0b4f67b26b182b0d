//! Wall-clock seam for journal timestamps.

use time::OffsetDateTime;

/// Source of record timestamps and archive suffixes.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
