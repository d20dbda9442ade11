//! Timestamps and millisecond record ids.
//!
//! DESIGN
//! ======
//! Record keys embed a millisecond timestamp (`todo:{user}:{millis}`), so two
//! writes in the same millisecond would silently overwrite each other. The
//! `IdClock` hands out strictly increasing millisecond values per process:
//! normally wall-clock time, bumped by one when a caller would otherwise see
//! a repeat.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use time::OffsetDateTime;
use time::macros::format_description;

/// Current UTC time as an ISO-8601 string with millisecond precision,
/// e.g. `2024-01-15T09:30:00.123Z`.
#[must_use]
pub fn now_iso() -> String {
    format_iso(OffsetDateTime::now_utc())
}

/// Format a timestamp the way every record's `createdAt`-style field is stored.
#[must_use]
pub fn format_iso(at: OffsetDateTime) -> String {
    let fmt = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
    at.to_offset(time::UtcOffset::UTC)
        .format(&fmt)
        .unwrap_or_default()
}

/// Wall-clock milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

/// Monotonic millisecond id source shared across handlers.
#[derive(Clone, Default)]
pub struct IdClock {
    last: Arc<AtomicI64>,
}

impl IdClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id: `max(now, last + 1)`.
    pub fn next_millis(&self) -> i64 {
        self.next_after(now_millis())
    }

    fn next_after(&self, now: i64) -> i64 {
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

#[cfg(test)]
#[path = "clock_test.rs"]
mod tests;
