//! Local time ⇄ UTC conversion for schedules
//!
//! Users schedule threads as a local date, time and zone. Zone data comes
//! from an external converter behind [`ZoneConverter`]. [`OffsetZones`] is a
//! small table-driven implementation for fixed-offset zones, used by tests
//! and by deployments that only schedule in UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::TimeZoneError;

/// Accepted date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time formats tried in order
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S"];

/// A UTC instant rendered in a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTime {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    /// e.g. `2025-03-01 09:30 Europe/Berlin`
    pub display: String,
}

pub trait ZoneConverter: Send + Sync {
    /// Interpret `date` and `time` in `zone` and return the UTC instant
    ///
    /// # Errors
    ///
    /// `InvalidZone`, `InvalidDate` or `InvalidTime` for malformed input.
    fn to_utc(&self, date: &str, time: &str, zone: &str) -> Result<DateTime<Utc>, TimeZoneError>;

    /// Render a UTC instant in `zone`
    ///
    /// # Errors
    ///
    /// `InvalidZone` if the zone is unknown.
    fn from_utc(&self, instant: DateTime<Utc>, zone: &str) -> Result<LocalTime, TimeZoneError>;
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> Result<NaiveDate, TimeZoneError> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|_| TimeZoneError::InvalidDate(date.to_string()))
}

/// Parse an `HH:MM` or `HH:MM:SS` time
pub fn parse_time(time: &str) -> Result<NaiveTime, TimeZoneError> {
    let trimmed = time.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| TimeZoneError::InvalidTime(time.to_string()))
}

/// Fixed-offset zone table
#[derive(Debug, Clone)]
pub struct OffsetZones {
    zones: HashMap<String, FixedOffset>,
}

impl Default for OffsetZones {
    fn default() -> Self {
        Self::utc()
    }
}

impl OffsetZones {
    /// A table knowing only `UTC`, `Etc/UTC` and `GMT`
    pub fn utc() -> Self {
        let utc = FixedOffset::east_opt(0).expect("zero offset is in range");
        let zones = ["UTC", "Etc/UTC", "GMT"]
            .into_iter()
            .map(|name| (name.to_string(), utc))
            .collect();
        Self { zones }
    }

    /// Add a zone `offset_seconds` east of UTC
    ///
    /// # Errors
    ///
    /// `InvalidZone` if the name is blank or the offset is a day or more.
    pub fn with_zone(mut self, name: &str, offset_seconds: i32) -> Result<Self, TimeZoneError> {
        if name.trim().is_empty() || name.contains(char::is_whitespace) {
            return Err(TimeZoneError::InvalidZone(name.to_string()));
        }
        let offset = FixedOffset::east_opt(offset_seconds)
            .ok_or_else(|| TimeZoneError::InvalidZone(name.to_string()))?;
        self.zones.insert(name.to_string(), offset);
        Ok(self)
    }

    /// Whether `zone` is a known identifier
    pub fn is_valid_zone(&self, zone: &str) -> bool {
        self.zones.contains_key(zone)
    }

    fn offset(&self, zone: &str) -> Result<FixedOffset, TimeZoneError> {
        self.zones
            .get(zone)
            .copied()
            .ok_or_else(|| TimeZoneError::InvalidZone(zone.to_string()))
    }
}

impl ZoneConverter for OffsetZones {
    fn to_utc(&self, date: &str, time: &str, zone: &str) -> Result<DateTime<Utc>, TimeZoneError> {
        let offset = self.offset(zone)?;
        let local = NaiveDateTime::new(parse_date(date)?, parse_time(time)?);

        offset
            .from_local_datetime(&local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| TimeZoneError::InvalidTime(time.to_string()))
    }

    fn from_utc(&self, instant: DateTime<Utc>, zone: &str) -> Result<LocalTime, TimeZoneError> {
        let local = instant.with_timezone(&self.offset(zone)?);
        let date = local.format(DATE_FORMAT).to_string();
        let time = local.format("%H:%M").to_string();
        let display = format!("{} {} {}", date, time, zone);

        Ok(LocalTime {
            date,
            time,
            display,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zones() -> OffsetZones {
        OffsetZones::utc()
            .with_zone("Europe/Berlin", 3600)
            .unwrap()
            .with_zone("America/New_York", -5 * 3600)
            .unwrap()
    }

    #[test]
    fn test_to_utc_applies_offset() {
        let instant = zones().to_utc("2025-01-15", "09:30", "Europe/Berlin").unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-01-15T08:30:00+00:00");

        let instant = zones().to_utc("2025-01-15", "22:00", "America/New_York").unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-01-16T03:00:00+00:00");
    }

    #[test]
    fn test_round_trip() {
        let zones = zones();
        let instant = zones.to_utc("2025-06-01", "18:45", "Europe/Berlin").unwrap();
        let local = zones.from_utc(instant, "Europe/Berlin").unwrap();

        assert_eq!(local.date, "2025-06-01");
        assert_eq!(local.time, "18:45");
        assert_eq!(local.display, "2025-06-01 18:45 Europe/Berlin");
    }

    #[test]
    fn test_seconds_are_accepted() {
        assert!(zones().to_utc("2025-01-15", "09:30:15", "UTC").is_ok());
    }

    #[test]
    fn test_invalid_zone() {
        assert_eq!(
            zones().to_utc("2025-01-15", "09:30", "Mars/Olympus"),
            Err(TimeZoneError::InvalidZone("Mars/Olympus".to_string()))
        );
        assert!(matches!(
            zones().from_utc(Utc::now(), "Nowhere"),
            Err(TimeZoneError::InvalidZone(_))
        ));
    }

    #[test]
    fn test_invalid_date() {
        for date in ["2025-13-01", "2025-02-30", "tomorrow", ""] {
            assert_eq!(
                zones().to_utc(date, "09:30", "UTC"),
                Err(TimeZoneError::InvalidDate(date.to_string())),
                "{date:?}"
            );
        }
    }

    #[test]
    fn test_invalid_time() {
        for time in ["25:00", "12:60", "noon", ""] {
            assert_eq!(
                zones().to_utc("2025-01-15", time, "UTC"),
                Err(TimeZoneError::InvalidTime(time.to_string())),
                "{time:?}"
            );
        }
    }

    #[test]
    fn test_with_zone_rejects_bad_input() {
        assert!(OffsetZones::utc().with_zone("", 0).is_err());
        assert!(OffsetZones::utc().with_zone("Bad Zone", 0).is_err());
        assert!(OffsetZones::utc().with_zone("Too/Far", 86_400).is_err());
    }

    #[test]
    fn test_is_valid_zone() {
        let zones = zones();
        assert!(zones.is_valid_zone("UTC"));
        assert!(zones.is_valid_zone("Europe/Berlin"));
        assert!(!zones.is_valid_zone("europe/berlin"));
    }
}
