//! Time source for trace timestamps.

use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the current time.
///
/// Abstracted so traces can be produced with deterministic timestamps in tests.
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current instant as an ISO-8601 UTC string with millisecond
    /// precision, e.g. `2011-12-03T10:15:30.123Z`.
    fn now_iso(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Wall clock backed by `chrono::Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
