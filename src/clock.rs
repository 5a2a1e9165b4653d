//! Time source for the generators
//!
//! Every "now" the generators see comes from a [`Clock`] passed in by the
//! caller. The service keeps an [`OverridableClock`] in its state so "today"
//! can be pinned for demos and tests without touching wall-clock time.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat};
use thiserror::Error;

/// Clock errors
#[derive(Debug, Error)]
pub enum ClockError {
    #[error("Cannot parse '{0}' as a date or date-time")]
    InvalidOverride(String),
}

/// Source of the current local wall time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall-clock local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn parse(value: &str) -> Result<Self, ClockError> {
        parse_instant(value).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Wall-clock time unless an override is set
#[derive(Debug, Clone, Default)]
pub struct OverridableClock {
    pinned: Option<NaiveDateTime>,
}

impl OverridableClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin "now" to the given instant, or restore wall-clock time with `None`.
    ///
    /// An unparseable value leaves the current setting untouched.
    pub fn override_today(&mut self, value: Option<&str>) -> Result<(), ClockError> {
        self.pinned = value.map(parse_instant).transpose()?;
        Ok(())
    }

    pub fn is_overridden(&self) -> bool {
        self.pinned.is_some()
    }
}

impl Clock for OverridableClock {
    fn now(&self) -> NaiveDateTime {
        self.pinned.unwrap_or_else(|| SystemClock.now())
    }
}

/// Timestamp string for a clock instant, e.g. `2024-01-15T00:00:00.000Z`
pub fn format_timestamp(instant: NaiveDateTime) -> String {
    instant
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS[.fff]]` and RFC 3339.
///
/// A bare date means midnight. An RFC 3339 value keeps its own wall time.
fn parse_instant(value: &str) -> Result<NaiveDateTime, ClockError> {
    let value = value.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(instant) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(instant);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ClockError::InvalidOverride(value.to_string()))
}
