//! Time utilities for XMLTV timestamps and timezone selection

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;

use crate::errors::{AppError, AppResult};

/// `YYYYMMDDHHMMSS ±HHMM`, the XMLTV `start`/`stop` attribute format
pub const XMLTV_TIME_FORMAT: &str = "%Y%m%d%H%M%S %z";

/// `YYYYMMDDHHMMSS`, used for `previously-shown start`
pub const XMLTV_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

/// Zone in which guide timestamps are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuideTimezone {
    /// The host's local zone
    #[default]
    Local,
    /// A named IANA zone
    Named(Tz),
}

impl GuideTimezone {
    pub fn from_name(name: &str) -> AppResult<Self> {
        name.parse::<Tz>()
            .map(Self::Named)
            .map_err(|e| AppError::configuration(format!("Invalid timezone '{name}': {e}")))
    }

    /// Render an instant as an XMLTV timestamp with the offset valid at that instant
    pub fn format_xmltv(&self, instant: DateTime<Utc>) -> String {
        match self {
            Self::Local => instant.with_timezone(&Local).format(XMLTV_TIME_FORMAT).to_string(),
            Self::Named(tz) => instant.with_timezone(tz).format(XMLTV_TIME_FORMAT).to_string(),
        }
    }

    /// Render epoch seconds as an XMLTV timestamp
    pub fn format_epoch(&self, epoch_secs: i64) -> String {
        self.format_xmltv(from_epoch(epoch_secs))
    }

    /// Midnight at the start of `now`'s calendar day in this zone
    pub fn start_of_day(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Local => midnight_in(&Local, now),
            Self::Named(tz) => midnight_in(tz, now),
        }
    }
}

impl fmt::Display for GuideTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

fn midnight_in<Z: TimeZone>(tz: &Z, now: DateTime<Utc>) -> DateTime<Utc> {
    let date = now.with_timezone(tz).date_naive();
    let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
        return now;
    };

    // Zones that jump at midnight have no 00:00; take the first valid local time after it
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now)
}

/// Convert epoch seconds, clamping out-of-range values to the epoch
pub fn from_epoch(epoch_secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(epoch_secs, 0).unwrap_or_default()
}

/// UTC calendar day of an epoch timestamp
pub fn utc_date(epoch_secs: i64) -> NaiveDate {
    from_epoch(epoch_secs).date_naive()
}

/// Render an airdate for `previously-shown start`, in UTC
pub fn format_airdate(epoch_secs: i64) -> String {
    from_epoch(epoch_secs).format(XMLTV_DATE_FORMAT).to_string()
}

/// Parse an XMLTV `start`/`stop` attribute back into an instant
pub fn parse_xmltv_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value.trim(), XMLTV_TIME_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_format_in_named_zone() {
        let tz = GuideTimezone::from_name("Europe/London").unwrap();
        // Winter: GMT
        assert_eq!(tz.format_xmltv(utc(2024, 1, 15, 20, 0)), "20240115200000 +0000");
        // Summer: BST
        assert_eq!(tz.format_xmltv(utc(2024, 7, 15, 20, 0)), "20240715210000 +0100");
    }

    #[test]
    fn test_format_negative_offset() {
        let tz = GuideTimezone::from_name("America/New_York").unwrap();
        assert_eq!(tz.format_xmltv(utc(2024, 1, 15, 20, 30)), "20240115153000 -0500");
    }

    #[test]
    fn test_format_epoch() {
        let tz = GuideTimezone::from_name("UTC").unwrap();
        assert_eq!(tz.format_epoch(1_700_000_000), "20231114221320 +0000");
    }

    #[test]
    fn test_start_of_day() {
        let tz = GuideTimezone::from_name("America/New_York").unwrap();
        // 02:00 UTC on the 16th is still the 15th in New York
        let midnight = tz.start_of_day(utc(2024, 1, 16, 2, 0));
        assert_eq!(midnight, utc(2024, 1, 15, 5, 0));
    }

    #[test]
    fn test_airdate_is_utc() {
        assert_eq!(format_airdate(1_700_000_000), "20231114221320");
        assert_eq!(utc_date(1_700_000_000), NaiveDate::from_ymd_opt(2023, 11, 14).unwrap());
    }

    #[test]
    fn test_parse_round_trip() {
        let tz = GuideTimezone::from_name("Australia/Sydney").unwrap();
        let instant = utc(2024, 3, 1, 9, 15);
        assert_eq!(parse_xmltv_time(&tz.format_xmltv(instant)), Some(instant));
        assert_eq!(parse_xmltv_time("garbage"), None);
    }

    #[test]
    fn test_invalid_zone_name() {
        assert!(GuideTimezone::from_name("Not/AZone").is_err());
    }
}
