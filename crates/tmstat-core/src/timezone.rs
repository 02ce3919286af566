//! Timezone used to print bill cycle dates
//!
//! The API hands out UTC instants while the report shows calendar dates, so
//! the zone decides which day a midnight bill date lands on. The zone is
//! resolved from `--utc`, then `--timezone`, then `TZ`, then the system.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

use crate::error::{Result, TmstatError};

/// Date format used for bill cycle boundaries
pub const BILL_DATE_FORMAT: &str = "%d/%m/%Y";

/// Timezone selection for report dates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimezoneConfig {
    /// The zone dates are rendered in
    pub tz: Tz,
    /// Whether the zone is UTC
    pub is_utc: bool,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self::from_tz(get_local_timezone())
    }
}

impl TimezoneConfig {
    fn from_tz(tz: Tz) -> Self {
        Self {
            tz,
            is_utc: tz == Tz::UTC,
        }
    }

    /// UTC, independent of the environment
    pub fn utc() -> Self {
        Self::from_tz(Tz::UTC)
    }

    /// Resolve the zone from command line flags
    pub fn from_cli(timezone: Option<&str>, use_utc: bool) -> Result<Self> {
        if use_utc {
            return Ok(Self::utc());
        }

        match timezone {
            Some(name) => Tz::from_str(name).map(Self::from_tz).map_err(|_| {
                TmstatError::InvalidTimezone(format!(
                    "'{name}'. Use format like 'Europe/London' or 'UTC'"
                ))
            }),
            None => Ok(Self::default()),
        }
    }

    /// Label for log output
    pub fn display_name(&self) -> &str {
        if self.is_utc { "UTC" } else { self.tz.name() }
    }

    /// Wall-clock time of an instant in this zone
    pub fn naive_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.tz).naive_local()
    }

    /// Bill date as `dd/mm/yyyy` in this zone
    pub fn format_bill_date(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.tz)
            .format(BILL_DATE_FORMAT)
            .to_string()
    }
}

/// Detect the system's local timezone, falling back to UTC
pub fn get_local_timezone() -> Tz {
    if let Some(tz) = std::env::var("TZ")
        .ok()
        .and_then(|name| Tz::from_str(&name).ok())
    {
        debug!("Using timezone from TZ: {}", tz.name());
        return tz;
    }

    match iana_time_zone::get_timezone() {
        Ok(name) => Tz::from_str(&name).unwrap_or_else(|_| {
            debug!("Unknown system timezone '{}', using UTC", name);
            Tz::UTC
        }),
        Err(e) => {
            debug!("Could not detect system timezone: {:?}, using UTC", e);
            Tz::UTC
        }
    }
}
