//! Period boundaries: the start and end of the day, week, month and year
//! containing a `Moment`.
//!
//! Starts are at 00:00:00.000000 and ends at 23:59:59.999999 on the wall
//! clock of the moment's zone. Weeks run Monday through Sunday (ISO 8601).

use chrono::{Datelike, Days, NaiveDate, NaiveTime, TimeZone, Weekday};

use crate::moment::{localize, Moment};

/// The first day of each week.
pub const WEEK_START: Weekday = Weekday::Mon;

impl<Tz: TimeZone> Moment<Tz> {
    fn at(&self, date: NaiveDate, time: NaiveTime) -> Self {
        Moment {
            dt: localize(&self.dt.timezone(), date.and_time(time)),
        }
    }

    /// Midnight at the start of this day.
    pub fn start_of_day(&self) -> Self {
        self.at(self.date(), NaiveTime::MIN)
    }

    /// 23:59:59.999999 on this day.
    pub fn end_of_day(&self) -> Self {
        self.at(self.date(), last_microsecond())
    }

    /// Midnight on the Monday of this week.
    pub fn start_of_week(&self) -> Self {
        self.at(self.date().week(WEEK_START).first_day(), NaiveTime::MIN)
    }

    /// 23:59:59.999999 on the Sunday of this week.
    pub fn end_of_week(&self) -> Self {
        self.at(self.date().week(WEEK_START).last_day(), last_microsecond())
    }

    /// Midnight on the first of this month.
    pub fn start_of_month(&self) -> Self {
        self.at(first_of_month(self.date()), NaiveTime::MIN)
    }

    /// 23:59:59.999999 on the last day of this month.
    pub fn end_of_month(&self) -> Self {
        let first = first_of_month(self.date());
        let last = first + Days::new(u64::from(self.days_in_month() - 1));
        self.at(last, last_microsecond())
    }

    /// Midnight on January 1 of this year.
    pub fn start_of_year(&self) -> Self {
        self.at(first_of_year(self.date()), NaiveTime::MIN)
    }

    /// 23:59:59.999999 on December 31 of this year.
    pub fn end_of_year(&self) -> Self {
        let days = if self.is_leap_year() { 365 } else { 364 };
        let last = first_of_year(self.date()) + Days::new(days);
        self.at(last, last_microsecond())
    }

    /// `(start_of_day, end_of_day)`.
    pub fn day_tuple(&self) -> (Self, Self) {
        (self.start_of_day(), self.end_of_day())
    }

    /// `(start_of_week, end_of_week)`.
    pub fn week_tuple(&self) -> (Self, Self) {
        (self.start_of_week(), self.end_of_week())
    }

    /// `(start_of_month, end_of_month)`.
    pub fn month_tuple(&self) -> (Self, Self) {
        (self.start_of_month(), self.end_of_month())
    }

    /// `(start_of_year, end_of_year)`.
    pub fn year_tuple(&self) -> (Self, Self) {
        (self.start_of_year(), self.end_of_year())
    }

    /// Number of days in this month.
    pub fn days_in_month(&self) -> u32 {
        month_length(self.date())
    }

    /// Whether this moment falls in a leap year.
    pub fn is_leap_year(&self) -> bool {
        self.date().leap_year()
    }
}

/// Whether a given year is a leap year. Years outside chrono's supported
/// range report `false`.
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 1, 1).is_some_and(|date| date.leap_year())
}

/// Number of days in a given month of `year`, or `None` if the month is not
/// in 1–12 (or the year is outside chrono's supported range).
///
/// ```
/// use pd_time::days_in_month;
/// assert_eq!(days_in_month(2004, 2), Some(29));
/// assert_eq!(days_in_month(2009, 13), None);
/// ```
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(month_length)
}

// The last day number chrono accepts in the month of `date`.
fn month_length(date: NaiveDate) -> u32 {
    (29..=31)
        .rev()
        .find(|&day| date.with_day(day).is_some())
        .unwrap_or(28)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

fn first_of_year(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.ordinal0()))
}

fn last_microsecond() -> NaiveTime {
    NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).expect("23:59:59.999999 is a valid time")
}
