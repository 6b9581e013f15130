//! Parsing for the stored `"10:00 AM - 12:00 PM"` time-range strings.
//!
//! The booking flow stores the range as display text, so the shape has to be
//! validated here on every tick. Hours may be non-zero-padded and the AM/PM
//! suffix is case-insensitive. Only the start time feeds the reminder
//! schedule; the end time is checked for shape and otherwise ignored,
//! matching how the stored data has always been consumed.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

static TIME_RANGE_RE: OnceLock<Regex> = OnceLock::new();

fn time_range_re() -> &'static Regex {
    TIME_RANGE_RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(\d{1,2}:\d{2})\s*(AM|PM)\s*-\s*(\d{1,2}:\d{2})\s*(AM|PM)\s*$")
            .unwrap()
    })
}

/// Parses a stored time-range string into its start and end clock times.
///
/// Returns `None` for anything that does not match the 12-hour-clock range
/// shape. No ordering between start and end is enforced; the booking flow
/// owns that validation.
pub fn parse_time_range(raw: &str) -> Option<(NaiveTime, NaiveTime)> {
    let caps = time_range_re().captures(raw)?;

    let start = parse_clock(&caps[1], &caps[2])?;
    let end = parse_clock(&caps[3], &caps[4])?;
    Some((start, end))
}

fn parse_clock(hhmm: &str, meridiem: &str) -> Option<NaiveTime> {
    let normalized = format!("{} {}", hhmm, meridiem.to_uppercase());
    NaiveTime::parse_from_str(&normalized, "%I:%M %p").ok()
}

/// Combines a reservation date with the start portion of its time range.
///
/// This is the instant the lead time counts back from. `None` means the
/// stored string is malformed and the reservation should be skipped.
pub fn reservation_start(date: NaiveDate, time_range: &str) -> Option<NaiveDateTime> {
    let (start, _end) = parse_time_range(time_range)?;
    Some(date.and_time(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_morning_range() {
        let (start, end) = parse_time_range("9:00 AM - 11:00 AM").unwrap();
        assert_eq!(start, time(9, 0));
        assert_eq!(end, time(11, 0));
    }

    #[test]
    fn test_parse_noon_is_12_pm() {
        let (start, _) = parse_time_range("12:00 PM - 1:00 PM").unwrap();
        assert_eq!(start, time(12, 0));
    }

    #[test]
    fn test_parse_midnight_is_12_am() {
        let (start, _) = parse_time_range("12:00 AM - 1:00 AM").unwrap();
        assert_eq!(start, time(0, 0));
    }

    #[test]
    fn test_parse_tolerates_spacing_and_case() {
        let (start, end) = parse_time_range("  10:00am-12:00 PM ").unwrap();
        assert_eq!(start, time(10, 0));
        assert_eq!(end, time(12, 0));
    }

    #[test]
    fn test_malformed_strings_are_rejected() {
        assert!(parse_time_range("morning").is_none());
        assert!(parse_time_range("10:00 - 12:00").is_none());
        assert!(parse_time_range("10:00 AM").is_none());
        assert!(parse_time_range("25:00 AM - 1:00 PM").is_none());
        assert!(parse_time_range("").is_none());
    }

    #[test]
    fn test_reservation_start_combines_date_and_start() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
        let start = reservation_start(date, "10:00 AM - 12:00 PM").unwrap();
        assert_eq!(start, date.and_time(time(10, 0)));
    }

    #[test]
    fn test_reservation_start_malformed_is_none() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
        assert!(reservation_start(date, "whenever works").is_none());
    }
}
