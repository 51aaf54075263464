//! Week and date-key helpers.
//!
//! Weeks are Monday-start Gregorian weeks regardless of locale.
//! Pure functions, no state.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Calendar date of the Monday that starts the week containing `date`.
pub fn week_start_date(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Calendar date of the Sunday that ends the week containing `date`.
pub fn week_end_date(date: NaiveDate) -> NaiveDate {
    week_start_date(date) + Duration::days(6)
}

/// Monday 00:00:00.000 of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDateTime {
    week_start_date(date).and_time(NaiveTime::MIN)
}

/// Sunday 23:59:59.999 of the week containing `date`.
pub fn week_end(date: NaiveDate) -> NaiveDateTime {
    let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    week_end_date(date).and_time(end_of_day)
}

/// Canonical `YYYY-MM-DD` key for day-bucketed lookups.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// True if `date` falls in the week that starts on `week_start`.
pub fn is_in_week(week_start: NaiveDate, date: NaiveDate) -> bool {
    week_start_date(date) == week_start
}
