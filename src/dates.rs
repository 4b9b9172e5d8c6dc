//! Calendar helpers.
//!
//! Dates cross the public boundary as zero-padded ISO-8601 strings
//! (`YYYY-MM-DD`) and are held as [`NaiveDate`] everywhere else, so ordering
//! is chronological rather than lexicographic.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{GymError, Result};

pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_FORMAT)
        .map_err(|e| GymError::MalformedInput(format!("invalid date '{}': {}", s, e)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// First day of the `days`-day window ending at `end` (inclusive).
///
/// A window of zero days has no start. Windows reaching past the calendar's
/// lower bound start at [`NaiveDate::MIN`].
pub fn window_start(end: NaiveDate, days: u32) -> Option<NaiveDate> {
    let back = days.checked_sub(1)?;
    Some(
        end.checked_sub_days(Days::new(u64::from(back)))
            .unwrap_or(NaiveDate::MIN),
    )
}

pub fn same_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zero_padded_dates() {
        let date = parse_date("2024-06-03").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(format_date(date), "2024-06-03");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_date("03/06/2024"),
            Err(GymError::MalformedInput(_))
        ));
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn window_spans_month_boundary() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert_eq!(window_start(end, 3).map(format_date).as_deref(), Some("2024-02-29"));
        assert_eq!(window_start(end, 1), Some(end));
        assert_eq!(window_start(end, 0), None);
    }

    #[test]
    fn huge_window_clamps_to_calendar_start() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert_eq!(window_start(end, u32::MAX), Some(NaiveDate::MIN));
    }
}
