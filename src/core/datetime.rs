//! Date/time formats and the timestamp arithmetic of the ledger
//!
//! The format strings here are the single source for both parsing (service)
//! and formatting (protocol adapters), so a timestamp written by one layer is
//! always readable by the other.

use super::error::ValidationError;
use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};

/// Calendar date, e.g. `2024-01-31`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Combined date and time, e.g. `2024-01-31T18:05:00`
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Hour and minute, e.g. `18:05`
pub const TIME_FORMAT: &str = "%H:%M";

/// Upper bound used when a range query has no end date
const OPEN_END_YEARS: u32 = 10_000;

fn invalid(field: &str, value: &str, expected: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

/// Parse a combined date-time string as a UTC instant
pub fn parse_date_time(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| invalid("date", value, DATE_TIME_FORMAT))
}

/// Parse a calendar date
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid(field, value, DATE_FORMAT))
}

/// Parse an hour:minute time of day
pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| invalid("time", value, TIME_FORMAT))
}

/// Format an instant the way adapters put it on the wire
pub fn format_date_time(date: &DateTime<Utc>) -> String {
    date.format(DATE_TIME_FORMAT).to_string()
}

/// Resolve the timestamp of an updated record
///
/// Date components come from `date` when given, otherwise from `existing`.
/// Time components come from `time` (seconds zeroed) when given, otherwise
/// from `existing`. Sub-second precision is dropped whenever a new value is
/// composed; with neither override `existing` is returned unchanged.
pub fn compose_timestamp(
    existing: DateTime<Utc>,
    date: Option<&str>,
    time: Option<&str>,
) -> Result<DateTime<Utc>, ValidationError> {
    if date.is_none() && time.is_none() {
        return Ok(existing);
    }

    let day = match date {
        Some(value) => parse_date("date", value)?,
        None => existing.date_naive(),
    };

    let time_of_day = match time {
        Some(value) => parse_time(value)?,
        None => {
            let t = existing.time();
            NaiveTime::from_hms_opt(t.hour(), t.minute(), t.second())
                .ok_or_else(|| invalid("time", &t.to_string(), TIME_FORMAT))?
        }
    };

    Ok(day.and_time(time_of_day).and_utc())
}

/// Resolved, inclusive bounds of a range query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFrame {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeFrame {
    /// Resolve optional date-only bounds relative to `now`
    ///
    /// A start date covers its day from midnight; an end date covers its day
    /// up to the last nanosecond. Missing bounds are effectively open.
    pub fn resolve(
        start_date: Option<&str>,
        end_date: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let start = match start_date {
            Some(value) => start_of_day(parse_date("start_date", value)?),
            None => DateTime::<Utc>::MIN_UTC,
        };

        let end = match end_date {
            Some(value) => end_of_day(parse_date("end_date", value)?),
            None => now
                .checked_add_months(Months::new(OPEN_END_YEARS * 12))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        Ok(Self { start, end })
    }

    /// Inclusive on both ends
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant <= self.end
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    // 23:59:59.999999999 always exists for a valid NaiveDate
    let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&day.and_time(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_date_time() {
        assert_eq!(
            parse_date_time("2024-05-01T13:45:10").unwrap(),
            at(2024, 5, 1, 13, 45, 10)
        );
        assert!(parse_date_time("2024-05-01").is_err());
        assert!(parse_date_time("01/05/2024 13:45").is_err());
    }

    #[test]
    fn test_format_is_parse_inverse() {
        let instant = at(2023, 12, 31, 23, 59, 1);
        assert_eq!(format_date_time(&instant), "2023-12-31T23:59:01");
        assert_eq!(parse_date_time(&format_date_time(&instant)).unwrap(), instant);
    }

    #[test]
    fn test_compose_neither_keeps_existing_exactly() {
        let existing = at(2024, 3, 10, 8, 15, 42) + chrono::Duration::nanoseconds(123_456);
        assert_eq!(compose_timestamp(existing, None, None).unwrap(), existing);
    }

    #[test]
    fn test_compose_date_only_uses_existing_time() {
        let existing = at(2024, 3, 10, 8, 15, 42) + chrono::Duration::milliseconds(250);
        let composed = compose_timestamp(existing, Some("2024-04-01"), None).unwrap();
        assert_eq!(composed, at(2024, 4, 1, 8, 15, 42));
    }

    #[test]
    fn test_compose_time_only_uses_existing_date() {
        let existing = at(2024, 3, 10, 8, 15, 42);
        let composed = compose_timestamp(existing, None, Some("19:30")).unwrap();
        assert_eq!(composed, at(2024, 3, 10, 19, 30, 0));
    }

    #[test]
    fn test_compose_both() {
        let existing = at(2024, 3, 10, 8, 15, 42);
        let composed = compose_timestamp(existing, Some("2020-02-29"), Some("00:01")).unwrap();
        assert_eq!(composed, at(2020, 2, 29, 0, 1, 0));
    }

    #[test]
    fn test_compose_rejects_bad_input() {
        let existing = at(2024, 3, 10, 8, 15, 42);
        assert!(matches!(
            compose_timestamp(existing, Some("2024-13-01"), None),
            Err(ValidationError::InvalidFormat { ref field, .. }) if field == "date"
        ));
        assert!(matches!(
            compose_timestamp(existing, None, Some("25:00")),
            Err(ValidationError::InvalidFormat { ref field, .. }) if field == "time"
        ));
    }

    #[test]
    fn test_timeframe_open_bounds() {
        let now = at(2024, 1, 1, 0, 0, 0);
        let frame = TimeFrame::resolve(None, None, now).unwrap();
        assert_eq!(frame.start, DateTime::<Utc>::MIN_UTC);
        assert!(frame.end.year() >= 12_000);
        assert!(frame.contains(&at(1970, 1, 1, 0, 0, 0)));
        assert!(frame.contains(&at(2999, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn test_timeframe_single_day_boundaries() {
        let now = Utc::now();
        let frame = TimeFrame::resolve(Some("2024-01-01"), Some("2024-01-01"), now).unwrap();

        // Midnight at the start of the day is inside
        assert!(frame.contains(&at(2024, 1, 1, 0, 0, 0)));
        // So is the last representable instant of the day
        assert!(frame.contains(
            &(at(2024, 1, 1, 23, 59, 59) + chrono::Duration::nanoseconds(999_999_999))
        ));
        assert!(frame.contains(&(at(2024, 1, 1, 23, 59, 59) + chrono::Duration::milliseconds(500))));
        // Neighbouring days are outside
        assert!(!frame.contains(&at(2024, 1, 2, 0, 0, 0)));
        assert!(!frame.contains(&at(2023, 12, 31, 23, 59, 59)));
    }

    #[test]
    fn test_timeframe_rejects_malformed_dates() {
        let now = Utc::now();
        assert!(TimeFrame::resolve(Some("2024/01/01"), None, now).is_err());
        assert!(matches!(
            TimeFrame::resolve(None, Some("tomorrow"), now),
            Err(ValidationError::InvalidFormat { ref field, .. }) if field == "end_date"
        ));
    }
}
