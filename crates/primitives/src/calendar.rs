//! Month arithmetic on calendar dates.

use chrono::{Datelike, Days};

use crate::Date;

/// First day of the month containing `date`.
#[must_use]
pub fn month_start(date: Date) -> Date {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month following the one containing `date`.
#[must_use]
pub fn next_month_start(date: Date) -> Date {
    let (year, month) =
        if date.month() == 12 { (date.year() + 1, 1) } else { (date.year(), date.month() + 1) };
    Date::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Last day of the month containing `date`.
#[must_use]
pub fn month_end(date: Date) -> Date {
    next_month_start(date).checked_sub_days(Days::new(1)).unwrap_or(date)
}
