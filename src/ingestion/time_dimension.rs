//! Calendar decomposition of songplay timestamps.

use super::IngestError;
use crate::catalog_store::TimeDimensionRow;
use chrono::{DateTime, Datelike, Timelike};

/// Decompose a UTC epoch-millisecond timestamp.
///
/// `week` is the ISO-8601 week number, so the last days of December can land
/// in week 1 while `year` stays the calendar year. `weekday` is Monday = 0.
pub fn build_time_row(timestamp_ms: i64) -> Result<TimeDimensionRow, IngestError> {
    let at = DateTime::from_timestamp_millis(timestamp_ms)
        .ok_or(IngestError::InvalidTimestamp(timestamp_ms))?;
    Ok(TimeDimensionRow {
        start_time: timestamp_ms,
        hour: at.hour(),
        day: at.day(),
        week: at.iso_week().week(),
        month: at.month(),
        year: at.year(),
        weekday: at.weekday().num_days_from_monday(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        start_time: i64,
        hour: u32,
        day: u32,
        week: u32,
        month: u32,
        year: i32,
        weekday: u32,
    ) -> TimeDimensionRow {
        TimeDimensionRow {
            start_time,
            hour,
            day,
            week,
            month,
            year,
            weekday,
        }
    }

    #[test]
    fn decomposes_log_timestamp() {
        // 2018-11-11T02:33:56.796Z, a Sunday
        assert_eq!(
            build_time_row(1541903636796).unwrap(),
            row(1541903636796, 2, 11, 45, 11, 2018, 6)
        );
    }

    #[test]
    fn epoch_is_a_thursday() {
        assert_eq!(build_time_row(0).unwrap(), row(0, 0, 1, 1, 1, 1970, 3));
    }

    #[test]
    fn iso_week_crosses_year_boundary() {
        // 2018-12-31T23:59:59Z is a Monday in ISO week 1 of 2019
        assert_eq!(
            build_time_row(1546300799000).unwrap(),
            row(1546300799000, 23, 31, 1, 12, 2018, 0)
        );
        // 2021-01-01T00:00:00Z is a Friday in ISO week 53 of 2020
        assert_eq!(
            build_time_row(1609459200000).unwrap(),
            row(1609459200000, 0, 1, 53, 1, 2021, 4)
        );
    }

    #[test]
    fn negative_timestamps_are_before_epoch() {
        assert_eq!(
            build_time_row(-1000).unwrap(),
            row(-1000, 23, 31, 1, 12, 1969, 2)
        );
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(
            build_time_row(1543537327796).unwrap(),
            build_time_row(1543537327796).unwrap()
        );
    }

    #[test]
    fn out_of_range_timestamp_is_rejected() {
        assert!(matches!(
            build_time_row(i64::MAX),
            Err(IngestError::InvalidTimestamp(i64::MAX))
        ));
    }
}
