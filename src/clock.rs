//! Clock in the reference timezone.
//!
//! Cooldown math and message timestamps both go through this seam, so tests
//! can pin time with [`FixedClock`].

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub trait Clock: Send + Sync {
    /// Current time in the reference timezone.
    fn now(&self) -> DateTime<Tz>;
}

/// Wall clock converted into the configured timezone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.timezone)
    }
}

/// Clock pinned to one instant, for tests.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: DateTime<Tz>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Tz>) -> Self {
        Self { instant }
    }

    /// Parse an RFC 3339 instant and pin the clock to it in `timezone`.
    pub fn at(rfc3339: &str, timezone: Tz) -> Self {
        let instant = DateTime::parse_from_rfc3339(rfc3339)
            .expect("valid RFC 3339 instant")
            .with_timezone(&timezone);
        Self::new(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.instant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_returns_pinned_instant() {
        let clock = FixedClock::at("2024-03-01T10:00:00+01:00", chrono_tz::Europe::Amsterdam);
        assert_eq!(clock.now().to_rfc3339(), "2024-03-01T10:00:00+01:00");
    }

    #[test]
    fn test_system_clock_uses_reference_timezone() {
        let clock = SystemClock::new(chrono_tz::Europe::Amsterdam);
        assert_eq!(clock.now().timezone(), chrono_tz::Europe::Amsterdam);
    }
}
