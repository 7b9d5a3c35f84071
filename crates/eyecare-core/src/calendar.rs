//! Local-calendar helpers for week and month bucketing.
//!
//! Weeks run Sunday 00:00:00.000 through Saturday 23:59:59.999 in local time.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, Utc};

use crate::clock::local_from_naive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekBounds {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Local date of the Sunday that opens the week
    pub first_day: NaiveDate,
}

/// Bounds of the week containing `now`.
pub fn week_of(now: DateTime<Local>) -> WeekBounds {
    let today = now.date_naive();
    let first_day = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
    let next_first_day = first_day + Duration::days(7);

    let start = start_of_day(first_day);
    let end = start_of_day(next_first_day) - Duration::milliseconds(1);

    WeekBounds { start, end, first_day }
}

/// Index into a week's daily array, Sunday = 0.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

/// Local calendar date of a stored instant.
pub fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

/// Local (month 1-12, year) of a stored instant.
pub fn month_year(instant: DateTime<Utc>) -> (u32, i32) {
    let date = local_date(instant);
    (date.month(), date.year())
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    local_from_naive(date.and_time(NaiveTime::MIN)).with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Local> {
        ManualClock::at_local(date(y, m, d).and_hms_opt(12, 0, 0).unwrap()).now()
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // Wednesday 2026-10-14
        let bounds = week_of(noon(2026, 10, 14));

        assert_eq!(bounds.first_day, date(2026, 10, 11));
        assert_eq!(local_date(bounds.start), date(2026, 10, 11));
        assert_eq!(local_date(bounds.end), date(2026, 10, 17));
    }

    #[test]
    fn test_sunday_and_saturday_belong_to_same_week() {
        let sunday = week_of(noon(2026, 10, 11));
        let saturday = week_of(noon(2026, 10, 17));

        assert_eq!(sunday, saturday);
    }

    #[test]
    fn test_week_end_is_last_millisecond() {
        let bounds = week_of(noon(2026, 10, 14));
        let next = week_of(noon(2026, 10, 18));

        assert_eq!(next.start - bounds.end, Duration::milliseconds(1));
    }

    #[test]
    fn test_week_spanning_month_boundary() {
        // Thursday 2026-10-01; the week opened on Sunday 2026-09-27
        let bounds = week_of(noon(2026, 10, 1));

        assert_eq!(bounds.first_day, date(2026, 9, 27));
        assert_eq!(month_year(bounds.start), (9, 2026));
    }

    #[test]
    fn test_weekday_index() {
        assert_eq!(weekday_index(date(2026, 10, 11)), 0);
        assert_eq!(weekday_index(date(2026, 10, 14)), 3);
        assert_eq!(weekday_index(date(2026, 10, 17)), 6);
    }
}
