//! Wall-clock abstraction for event timestamps.

use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time as ISO-8601 UTC with millisecond precision, e.g.
    /// `2025-01-01T00:00:00.000Z`.
    fn iso_timestamp(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant, for deterministic tests.
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_iso_timestamp_matches_browser_format() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 12, 30, 0).unwrap());
        assert_eq!(clock.iso_timestamp(), "2025-01-01T12:30:00.000Z");
    }

    #[test]
    fn test_system_clock_is_parseable() {
        let stamp = SystemClock.iso_timestamp();
        assert!(stamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
