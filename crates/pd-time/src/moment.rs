//! `Moment` — an instant with calendar-aware field access.
//!
//! A `Moment` wraps a [`chrono::DateTime`] and interprets it in a time zone
//! (the local system zone unless another one is given). Every calendar field
//! can be read and written; writing a field shifts the whole instant by the
//! difference, so overflow rolls into the next unit instead of failing:
//!
//! ```
//! use chrono::Utc;
//! use pd_time::{Moment, Parts};
//!
//! let mut m = Moment::from_parts_in(Parts::ymd(2009, 1, 30), Utc).unwrap();
//! m.set_day(i64::from(m.day()) + 5);
//! assert_eq!(m.to_string(), "Moment(2009-02-04, 00:00:00)");
//! ```
//!
//! # Field writes
//! `set_year` and `set_month` use calendar-correct addition: the day of the
//! month is clamped to the length of the target month (January 31 plus one
//! month is February 28 or 29). Days and finer units add an elapsed
//! duration to the instant.
//!
//! Out-of-range and negative values follow the same delta rule:
//! `set_day(0)` is the last day of the previous month, `set_month(13)` is
//! January of the following year, `set_hour(-1)` is 23:00 of the previous
//! day.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use chrono::format::{parse, ParseResult, Parsed, StrftimeItems};
use chrono::{
    DateTime, Datelike, Local, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime,
    TimeDelta, TimeZone, Timelike, Utc, Weekday,
};
use pd_core::errors::{Error, Result};
use pd_core::{ensure, fail, Settings};

use crate::delta::Delta;
use crate::input::{Input, Parts};
use crate::time_unit::TimeUnit;

/// An absolute instant, viewed through the calendar of time zone `Tz`.
///
/// Equality, ordering and hashing use the instant alone: two moments in
/// different zones that denote the same instant are equal.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        transparent,
        bound(
            serialize = "DateTime<Tz>: serde::Serialize",
            deserialize = "DateTime<Tz>: serde::Deserialize<'de>"
        )
    )
)]
pub struct Moment<Tz: TimeZone = Local> {
    pub(crate) dt: DateTime<Tz>,
}

/// A moment in UTC.
pub type UtcMoment = Moment<Utc>;

// ── Constructors in the local zone ───────────────────────────────────────────

impl Moment<Local> {
    /// Build a local moment from any supported [`Input`].
    ///
    /// ```
    /// use pd_time::Moment;
    /// assert!(Moment::new(1234567890).is_ok());
    /// assert!(Moment::new(("14 Feb 2009", "%d %b %Y")).is_ok());
    /// assert!(Moment::new(("14 Feb 2009", "")).is_err());
    /// ```
    ///
    /// # Errors
    /// `InvalidInput` when the input does not describe an instant.
    pub fn new(input: impl Into<Input>) -> Result<Self> {
        Self::new_in(input, Local)
    }

    /// The current instant (see [`Settings::now`]).
    pub fn now() -> Self {
        Self::now_in(Local)
    }

    /// Seconds since the Unix epoch.
    ///
    /// # Errors
    /// `InvalidInput` for non-finite or unrepresentable timestamps.
    pub fn from_timestamp(ts: f64) -> Result<Self> {
        Self::from_timestamp_in(ts, Local)
    }

    /// A local wall-clock date and time.
    pub fn from_naive(naive: NaiveDateTime) -> Self {
        Self::from_naive_in(naive, Local)
    }

    /// Midnight of `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_date_in(date, Local)
    }

    /// `time` on today's date.
    pub fn from_time(time: NaiveTime) -> Self {
        Self::from_time_in(time, Local)
    }

    /// Broken-down calendar fields.
    ///
    /// # Errors
    /// `InvalidInput` if the fields do not name a real date and time.
    pub fn from_parts(parts: impl Into<Parts>) -> Result<Self> {
        Self::from_parts_in(parts, Local)
    }

    /// Parse `input` with the strftime-style `pattern`.
    ///
    /// # Errors
    /// `InvalidInput` if the pattern is empty or does not match.
    pub fn parse(input: &str, pattern: &str) -> Result<Self> {
        Self::parse_in(input, pattern, Local)
    }

    /// Now, moved back by `delta` (years, then months, then the rest).
    ///
    /// # Errors
    /// `OutOfRange` if the result is not representable.
    pub fn ago(delta: Delta) -> Result<Self> {
        Self::ago_in(delta, Local)
    }
}

impl Default for Moment<Local> {
    fn default() -> Self {
        Self::now()
    }
}

// ── Constructors in an explicit zone ─────────────────────────────────────────

impl<Tz: TimeZone> Moment<Tz> {
    /// Build a moment in `tz` from any supported [`Input`].
    ///
    /// # Errors
    /// `InvalidInput` when the input does not describe an instant;
    /// `OutOfRange` when a relative offset leaves the representable range.
    pub fn new_in(input: impl Into<Input>, tz: Tz) -> Result<Self> {
        let result = match input.into() {
            Input::Now => Ok(Self::now_in(tz)),
            Input::Timestamp(ts) => Self::from_timestamp_in(ts, tz),
            Input::DateTime(naive) => Ok(Self::from_naive_in(naive, tz)),
            Input::Date(date) => Ok(Self::from_date_in(date, tz)),
            Input::Time(time) => Ok(Self::from_time_in(time, tz)),
            Input::Parts(parts) => Self::from_parts_in(parts, tz),
            Input::Formatted { input, pattern } => Self::parse_in(&input, &pattern, tz),
            Input::Ago(delta) => Self::ago_in(delta, tz),
        };
        if let Err(err) = &result {
            log::debug!("rejected moment input: {err}");
        }
        result
    }

    /// Wrap an existing zoned date/time.
    pub fn from_datetime(dt: DateTime<Tz>) -> Self {
        Moment { dt }
    }

    /// The current instant in `tz`.
    pub fn now_in(tz: Tz) -> Self {
        Moment {
            dt: tz.from_utc_datetime(&Settings::now().naive_utc()),
        }
    }

    /// Seconds since the Unix epoch, viewed in `tz`.
    ///
    /// # Errors
    /// `InvalidInput` for non-finite or unrepresentable timestamps.
    pub fn from_timestamp_in(ts: f64, tz: Tz) -> Result<Self> {
        ensure!(ts.is_finite(), "timestamp must be finite, got {ts}");
        let micros = (ts * 1e6).round() as i64;
        let secs = micros.div_euclid(1_000_000);
        let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
        let Some(utc) = DateTime::from_timestamp(secs, nanos) else {
            fail!("timestamp {ts} is outside the representable range");
        };
        Ok(Moment {
            dt: utc.with_timezone(&tz),
        })
    }

    /// A wall-clock date and time in `tz`.
    pub fn from_naive_in(naive: NaiveDateTime, tz: Tz) -> Self {
        Moment {
            dt: localize(&tz, naive),
        }
    }

    /// Midnight of `date` in `tz`.
    pub fn from_date_in(date: NaiveDate, tz: Tz) -> Self {
        Self::from_naive_in(date.and_time(NaiveTime::MIN), tz)
    }

    /// `time` on today's date in `tz`.
    pub fn from_time_in(time: NaiveTime, tz: Tz) -> Self {
        let today = Self::now_in(tz.clone()).date();
        Self::from_naive_in(today.and_time(time), tz)
    }

    /// Broken-down calendar fields in `tz`.
    ///
    /// # Errors
    /// `InvalidInput` if the fields do not name a real date and time.
    pub fn from_parts_in(parts: impl Into<Parts>, tz: Tz) -> Result<Self> {
        let naive = parts.into().to_naive()?;
        Ok(Self::from_naive_in(naive, tz))
    }

    /// Parse `input` with the strftime-style `pattern`, in `tz`.
    ///
    /// A pattern without time fields yields midnight; one without date
    /// fields yields that time today. Minutes and seconds left out after an
    /// hour are zero, and a missing month or day after a year is the first.
    /// A parsed UTC offset (`%z`) fixes the instant, which is then viewed in
    /// `tz`.
    ///
    /// ```
    /// use chrono::Utc;
    /// use pd_time::Moment;
    /// let m = Moment::parse_in("2009-02-14 00:31:30 +0100", "%Y-%m-%d %H:%M:%S %z", Utc).unwrap();
    /// assert_eq!(m.timestamp(), 1234567890.0);
    /// let m = Moment::parse_in("2009-02-14 10", "%Y-%m-%d %H", Utc).unwrap();
    /// assert_eq!(m.to_string(), "Moment(2009-02-14, 10:00:00)");
    /// ```
    ///
    /// # Errors
    /// `InvalidInput` if the pattern is empty, has no date or time fields,
    /// or does not match.
    pub fn parse_in(input: &str, pattern: &str, tz: Tz) -> Result<Self> {
        ensure!(!pattern.is_empty(), "missing format for {input:?}");
        let mut parsed = Parsed::new();
        if let Err(err) = parse(&mut parsed, input, StrftimeItems::new(pattern)) {
            log::debug!("{input:?} does not match {pattern:?}: {err}");
            fail!("{input:?} does not match format {pattern:?}: {err}");
        }
        ensure!(
            parsed != Parsed::new(),
            "format {pattern:?} has no date or time fields"
        );
        match Self::from_parsed(parsed, tz) {
            Ok(m) => Ok(m),
            Err(err) => {
                log::debug!("{input:?} is incomplete for {pattern:?}: {err}");
                fail!("{input:?} does not name an instant with format {pattern:?}: {err}");
            }
        }
    }

    fn from_parsed(mut parsed: Parsed, tz: Tz) -> ParseResult<Self> {
        if parsed.offset().is_some() || parsed.timestamp().is_some() {
            let fixed = parsed.to_datetime()?;
            return Ok(Moment {
                dt: fixed.with_timezone(&tz),
            });
        }

        let has_year = parsed.year().is_some()
            || parsed.year_mod_100().is_some()
            || parsed.isoyear().is_some()
            || parsed.isoyear_mod_100().is_some();
        let by_week = parsed.isoweek().is_some()
            || parsed.week_from_mon().is_some()
            || parsed.week_from_sun().is_some();
        let has_date = has_year
            || by_week
            || parsed.year_div_100().is_some()
            || parsed.month().is_some()
            || parsed.day().is_some()
            || parsed.ordinal().is_some();
        if has_year && !by_week && parsed.ordinal().is_none() {
            if parsed.month().is_none() {
                parsed.set_month(1)?;
            }
            if parsed.day().is_none() {
                parsed.set_day(1)?;
            }
        }
        let date = if has_date {
            parsed.to_naive_date()?
        } else {
            Self::now_in(tz.clone()).date()
        };

        let has_hour = parsed.hour_div_12().is_some() || parsed.hour_mod_12().is_some();
        if has_hour && parsed.minute().is_none() {
            parsed.set_minute(0)?;
        }
        let time = if has_hour
            || parsed.minute().is_some()
            || parsed.second().is_some()
            || parsed.nanosecond().is_some()
        {
            parsed.to_naive_time()?
        } else {
            NaiveTime::MIN
        };
        Ok(Self::from_naive_in(date.and_time(time), tz))
    }

    /// Now in `tz`, moved back by `delta`.
    ///
    /// Components are applied years, then months, then days and finer, so
    /// `Delta::new().months(1).days(-5)` means one month ago plus five days.
    ///
    /// # Errors
    /// `OutOfRange` if the result is not representable.
    pub fn ago_in(delta: Delta, tz: Tz) -> Result<Self> {
        let mut m = Self::now_in(tz);
        m.try_add(delta.negated())?;
        Ok(m)
    }
}

// ── Field access ─────────────────────────────────────────────────────────────

impl<Tz: TimeZone> Moment<Tz> {
    /// The year.
    pub fn year(&self) -> i32 {
        self.dt.year()
    }

    /// The month (1–12).
    pub fn month(&self) -> u32 {
        self.dt.month()
    }

    /// The day of the month (1–31).
    pub fn day(&self) -> u32 {
        self.dt.day()
    }

    /// The hour (0–23).
    pub fn hour(&self) -> u32 {
        self.dt.hour()
    }

    /// The minute (0–59).
    pub fn minute(&self) -> u32 {
        self.dt.minute()
    }

    /// The second (0–59).
    pub fn second(&self) -> u32 {
        self.dt.second()
    }

    /// The microsecond (0–999 999).
    pub fn microsecond(&self) -> u32 {
        self.dt.nanosecond() / 1_000
    }

    /// The day of the week.
    pub fn weekday(&self) -> Weekday {
        self.dt.weekday()
    }

    /// Whole weeks elapsed since January 1 (0-based).
    pub fn week(&self) -> u32 {
        self.dt.ordinal0() / 7
    }

    /// The day of the year (1–366).
    pub fn day_of_year(&self) -> u32 {
        self.dt.ordinal()
    }

    /// Read the field that corresponds to `unit`.
    pub fn get(&self, unit: TimeUnit) -> i64 {
        match unit {
            TimeUnit::Years => i64::from(self.year()),
            TimeUnit::Months => i64::from(self.month()),
            TimeUnit::Weeks => i64::from(self.week()),
            TimeUnit::Days => i64::from(self.day()),
            TimeUnit::Hours => i64::from(self.hour()),
            TimeUnit::Minutes => i64::from(self.minute()),
            TimeUnit::Seconds => i64::from(self.second()),
            TimeUnit::Microseconds => i64::from(self.microsecond()),
        }
    }
}

// ── Mutation ─────────────────────────────────────────────────────────────────

impl<Tz: TimeZone> Moment<Tz> {
    /// Move by `delta` and return `self` for chaining.
    ///
    /// Years and months are added on the calendar, clamping the day to the
    /// target month's length; the remaining components are added as one
    /// elapsed duration.
    ///
    /// # Panics
    /// If the result leaves chrono's representable range (about ±262 000
    /// years). Use [`try_add`](Self::try_add) to handle that case.
    pub fn add(&mut self, delta: Delta) -> &mut Self {
        self.try_add(delta).expect("moment arithmetic overflow")
    }

    /// Checked [`add`](Self::add). On error the moment is left unchanged.
    ///
    /// # Errors
    /// `OutOfRange` if the result is not representable.
    pub fn try_add(&mut self, delta: Delta) -> Result<&mut Self> {
        let overflow = || {
            Error::OutOfRange(format!(
                "{} shifted by {delta}",
                self.dt.naive_local()
            ))
        };
        let mut dt = self.dt.clone();
        if delta.years != 0 {
            let months = delta.years.checked_mul(12).ok_or_else(overflow)?;
            dt = add_months(&dt, months).ok_or_else(overflow)?;
        }
        if delta.months != 0 {
            dt = add_months(&dt, delta.months).ok_or_else(overflow)?;
        }
        let elapsed = delta.elapsed().ok_or_else(overflow)?;
        dt = dt.checked_add_signed(elapsed).ok_or_else(overflow)?;
        self.dt = dt;
        Ok(self)
    }

    /// Consuming [`add`](Self::add), for chaining on temporaries.
    ///
    /// ```
    /// use chrono::Utc;
    /// use pd_time::{Delta, Moment};
    /// let m = Moment::from_timestamp_in(1234567890.0, Utc).unwrap();
    /// let next = m.start_of_month().shifted(Delta::new().months(1));
    /// assert_eq!(next.to_string(), "Moment(2009-03-01, 00:00:00)");
    /// ```
    pub fn shifted(mut self, delta: Delta) -> Self {
        self.add(delta);
        self
    }

    /// Move by `n` units.
    pub fn shift(&mut self, unit: TimeUnit, n: i64) -> &mut Self {
        self.add(Delta::of(n, unit))
    }

    /// Set the field for `unit` by shifting the difference from its current
    /// value. Values outside the field's range roll over.
    ///
    /// # Panics
    /// If the result leaves chrono's representable range, as
    /// [`add`](Self::add) does. [`try_set`](Self::try_set) reports that case
    /// instead.
    pub fn set(&mut self, unit: TimeUnit, value: i64) -> &mut Self {
        let current = self.get(unit);
        self.shift(unit, value.saturating_sub(current))
    }

    /// Checked [`set`](Self::set). On error the moment is left unchanged.
    ///
    /// ```
    /// use chrono::Utc;
    /// use pd_time::{Moment, Parts, TimeUnit};
    /// let mut m = Moment::from_parts_in(Parts::ymd(2009, 2, 14), Utc).unwrap();
    /// assert!(m.try_set(TimeUnit::Years, 300_000).is_err());
    /// assert_eq!(m.year(), 2009);
    /// ```
    ///
    /// # Errors
    /// `OutOfRange` if the result is not representable.
    pub fn try_set(&mut self, unit: TimeUnit, value: i64) -> Result<&mut Self> {
        let current = self.get(unit);
        self.try_add(Delta::of(value.saturating_sub(current), unit))
    }

    /// Set the year. February 29 clamps to February 28 in common years.
    ///
    /// # Panics
    /// Past chrono's range of about ±262 000 years; see
    /// [`try_set`](Self::try_set).
    pub fn set_year(&mut self, year: i64) -> &mut Self {
        self.set(TimeUnit::Years, year)
    }

    /// Set the month; values past 12 (or below 1) roll the year.
    ///
    /// # Panics
    /// If the roll-over leaves chrono's range; see [`try_set`](Self::try_set).
    pub fn set_month(&mut self, month: i64) -> &mut Self {
        self.set(TimeUnit::Months, month)
    }

    /// Set the day of the month; values past the month's length roll the
    /// month.
    ///
    /// # Panics
    /// If the roll-over leaves chrono's range; see [`try_set`](Self::try_set).
    pub fn set_day(&mut self, day: i64) -> &mut Self {
        self.set(TimeUnit::Days, day)
    }

    /// Set the hour; values past 23 roll the day.
    ///
    /// # Panics
    /// If the roll-over leaves chrono's range; see [`try_set`](Self::try_set).
    pub fn set_hour(&mut self, hour: i64) -> &mut Self {
        self.set(TimeUnit::Hours, hour)
    }

    /// Set the minute; values past 59 roll the hour.
    ///
    /// # Panics
    /// If the roll-over leaves chrono's range; see [`try_set`](Self::try_set).
    pub fn set_minute(&mut self, minute: i64) -> &mut Self {
        self.set(TimeUnit::Minutes, minute)
    }

    /// Set the second; values past 59 roll the minute.
    ///
    /// # Panics
    /// If the roll-over leaves chrono's range; see [`try_set`](Self::try_set).
    pub fn set_second(&mut self, second: i64) -> &mut Self {
        self.set(TimeUnit::Seconds, second)
    }

    /// Set the microsecond; values past 999 999 roll the second.
    ///
    /// # Panics
    /// If the roll-over leaves chrono's range; see [`try_set`](Self::try_set).
    pub fn set_microsecond(&mut self, microsecond: i64) -> &mut Self {
        self.set(TimeUnit::Microseconds, microsecond)
    }

    /// Move to `weekday` within the same Monday-based week.
    pub fn set_weekday(&mut self, weekday: Weekday) -> &mut Self {
        let delta = i64::from(weekday.num_days_from_monday())
            - i64::from(self.weekday().num_days_from_monday());
        self.shift(TimeUnit::Days, delta)
    }

    /// Move to week `week` of the year (see [`week`](Self::week)), keeping
    /// the weekday. Values past the end of the year roll the year.
    pub fn set_week(&mut self, week: i64) -> &mut Self {
        self.set(TimeUnit::Weeks, week)
    }

    /// Replace the whole date/time.
    pub fn set_datetime(&mut self, dt: DateTime<Tz>) -> &mut Self {
        self.dt = dt;
        self
    }

    /// Replace the date, keeping the time of day.
    pub fn set_date(&mut self, date: NaiveDate) -> &mut Self {
        self.dt = localize(&self.dt.timezone(), date.and_time(self.time()));
        self
    }

    /// Replace the time of day, keeping the date.
    pub fn set_time(&mut self, time: NaiveTime) -> &mut Self {
        self.dt = localize(&self.dt.timezone(), self.date().and_time(time));
        self
    }

    /// Replace every calendar field.
    ///
    /// # Errors
    /// `InvalidInput` if the fields do not name a real date and time; the
    /// moment is left unchanged.
    pub fn set_parts(&mut self, parts: impl Into<Parts>) -> Result<&mut Self> {
        let naive = parts.into().to_naive()?;
        self.dt = localize(&self.dt.timezone(), naive);
        Ok(self)
    }

    /// Replace the instant with a Unix timestamp.
    ///
    /// # Errors
    /// `InvalidInput` for non-finite or unrepresentable timestamps; the
    /// moment is left unchanged.
    pub fn set_timestamp(&mut self, ts: f64) -> Result<&mut Self> {
        self.dt = Self::from_timestamp_in(ts, self.dt.timezone())?.dt;
        Ok(self)
    }
}

// ── Conversions ──────────────────────────────────────────────────────────────

impl<Tz: TimeZone> Moment<Tz> {
    /// The zoned date/time.
    pub fn datetime(&self) -> DateTime<Tz> {
        self.dt.clone()
    }

    /// Borrow the zoned date/time.
    pub fn as_datetime(&self) -> &DateTime<Tz> {
        &self.dt
    }

    /// The wall-clock date and time.
    pub fn naive(&self) -> NaiveDateTime {
        self.dt.naive_local()
    }

    /// The wall-clock date.
    pub fn date(&self) -> NaiveDate {
        self.dt.date_naive()
    }

    /// The wall-clock time of day.
    pub fn time(&self) -> NaiveTime {
        self.dt.time()
    }

    /// The calendar fields.
    pub fn parts(&self) -> Parts {
        Parts::ymd(self.year(), self.month(), self.day())
            .hms(self.hour(), self.minute(), self.second())
            .micro(self.microsecond())
    }

    /// Seconds since the Unix epoch, with microsecond fraction.
    pub fn timestamp(&self) -> f64 {
        self.dt.timestamp_micros() as f64 / 1e6
    }

    /// The instant with the zone offset removed, as a zone-less value.
    pub fn utc(&self) -> NaiveDateTime {
        self.dt.naive_utc()
    }

    /// The same instant viewed in UTC.
    pub fn to_utc(&self) -> Moment<Utc> {
        self.with_timezone(&Utc)
    }

    /// The same instant viewed in `tz`.
    pub fn with_timezone<Tz2: TimeZone>(&self, tz: &Tz2) -> Moment<Tz2> {
        Moment {
            dt: self.dt.with_timezone(tz),
        }
    }

    /// The zone this moment is viewed in.
    pub fn timezone(&self) -> Tz {
        self.dt.timezone()
    }
}

// ── Predicates ───────────────────────────────────────────────────────────────

impl<Tz: TimeZone> Moment<Tz> {
    fn today(&self) -> NaiveDate {
        Settings::now().with_timezone(&self.dt.timezone()).date_naive()
    }

    /// `true` if the date (ignoring the time) is before today.
    pub fn is_past_date(&self) -> bool {
        self.date() < self.today()
    }

    /// `true` if the date is today.
    pub fn is_today(&self) -> bool {
        self.date() == self.today()
    }

    /// `true` if the date (ignoring the time) is after today.
    pub fn is_future_date(&self) -> bool {
        self.date() > self.today()
    }
}

// ── Comparison ───────────────────────────────────────────────────────────────

impl<Tz: TimeZone, Tz2: TimeZone> PartialEq<Moment<Tz2>> for Moment<Tz> {
    fn eq(&self, other: &Moment<Tz2>) -> bool {
        self.dt == other.dt
    }
}

impl<Tz: TimeZone> Eq for Moment<Tz> {}

impl<Tz: TimeZone, Tz2: TimeZone> PartialOrd<Moment<Tz2>> for Moment<Tz> {
    fn partial_cmp(&self, other: &Moment<Tz2>) -> Option<Ordering> {
        self.dt.partial_cmp(&other.dt)
    }
}

impl<Tz: TimeZone> Ord for Moment<Tz> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dt.cmp(&other.dt)
    }
}

impl<Tz: TimeZone> Hash for Moment<Tz> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dt.hash(state);
    }
}

// ── Arithmetic operators ─────────────────────────────────────────────────────

impl<Tz: TimeZone> std::ops::Add<TimeDelta> for Moment<Tz> {
    type Output = Self;
    fn add(self, rhs: TimeDelta) -> Self {
        Moment {
            dt: self
                .dt
                .checked_add_signed(rhs)
                .expect("moment addition overflow"),
        }
    }
}

impl<Tz: TimeZone> std::ops::Sub<TimeDelta> for Moment<Tz> {
    type Output = Self;
    fn sub(self, rhs: TimeDelta) -> Self {
        Moment {
            dt: self
                .dt
                .checked_sub_signed(rhs)
                .expect("moment subtraction underflow"),
        }
    }
}

impl<Tz: TimeZone> std::ops::AddAssign<TimeDelta> for Moment<Tz> {
    fn add_assign(&mut self, rhs: TimeDelta) {
        self.dt = self
            .dt
            .clone()
            .checked_add_signed(rhs)
            .expect("moment addition overflow");
    }
}

impl<Tz: TimeZone> std::ops::SubAssign<TimeDelta> for Moment<Tz> {
    fn sub_assign(&mut self, rhs: TimeDelta) {
        self.dt = self
            .dt
            .clone()
            .checked_sub_signed(rhs)
            .expect("moment subtraction underflow");
    }
}

impl<Tz: TimeZone> std::ops::Sub<Moment<Tz>> for Moment<Tz> {
    type Output = TimeDelta;
    fn sub(self, rhs: Moment<Tz>) -> TimeDelta {
        self.dt.signed_duration_since(rhs.dt)
    }
}

impl<Tz: TimeZone> std::ops::Sub<&Moment<Tz>> for &Moment<Tz> {
    type Output = TimeDelta;
    fn sub(self, rhs: &Moment<Tz>) -> TimeDelta {
        self.dt.clone().signed_duration_since(rhs.dt.clone())
    }
}

// ── Conversions to and from chrono ───────────────────────────────────────────

impl<Tz: TimeZone> From<DateTime<Tz>> for Moment<Tz> {
    fn from(dt: DateTime<Tz>) -> Self {
        Moment { dt }
    }
}

impl<Tz: TimeZone> From<Moment<Tz>> for DateTime<Tz> {
    fn from(m: Moment<Tz>) -> Self {
        m.dt
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Resolve a wall-clock value in `tz`.
///
/// Ambiguous times (a backward transition) take the earlier instant. Times
/// skipped by a forward transition are moved one hour later.
pub(crate) fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => naive
            .checked_add_signed(TimeDelta::hours(1))
            .and_then(|later| tz.from_local_datetime(&later).earliest())
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

/// Calendar-correct month addition on the wall clock of `dt`.
fn add_months<Tz: TimeZone>(dt: &DateTime<Tz>, months: i64) -> Option<DateTime<Tz>> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    let naive = dt.naive_local();
    let shifted = if months >= 0 {
        naive.checked_add_months(magnitude)?
    } else {
        naive.checked_sub_months(magnitude)?
    };
    Some(localize(&dt.timezone(), shifted))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use pd_core::ScopedEvaluationInstant;

    fn utc(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> Moment<Utc> {
        Moment::from_parts_in(Parts::ymd(y, m, d).hms(h, mi, s), Utc).unwrap()
    }

    // Timestamp 1234567890 reads as 2009-02-14 00:31:30 one hour east of UTC.
    fn plus_one() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    fn cet(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> Moment<FixedOffset> {
        Moment::from_parts_in(Parts::ymd(y, m, d).hms(h, mi, s), plus_one()).unwrap()
    }

    #[test]
    fn test_from_timestamp() {
        let m = Moment::from_timestamp_in(1234567890.0, plus_one()).unwrap();
        assert_eq!(m.parts(), Parts::ymd(2009, 2, 14).hms(0, 31, 30));
        assert_eq!(m.weekday(), Weekday::Sat);
        assert_eq!(m.timestamp(), 1234567890.0);
    }

    #[test]
    fn test_fractional_timestamp_keeps_micros() {
        let m = Moment::from_timestamp_in(1.25, Utc).unwrap();
        assert_eq!(m.second(), 1);
        assert_eq!(m.microsecond(), 250_000);
    }

    #[test]
    fn test_rejects_bad_timestamps() {
        assert!(matches!(
            Moment::from_timestamp_in(f64::NAN, Utc),
            Err(Error::InvalidInput(_))
        ));
        assert!(Moment::from_timestamp_in(f64::INFINITY, Utc).is_err());
        assert!(Moment::from_timestamp_in(1e300, Utc).is_err());
    }

    #[test]
    fn test_input_dispatch() {
        let date = NaiveDate::from_ymd_opt(2009, 10, 2).unwrap();
        assert_eq!(
            Moment::new_in(date, Utc).unwrap(),
            utc(2009, 10, 2, 0, 0, 0)
        );
        assert_eq!(
            Moment::new_in(Parts::ymd(2009, 2, 14), Utc).unwrap(),
            utc(2009, 2, 14, 0, 0, 0)
        );
        assert_eq!(
            Moment::new_in(("2007-03-24 10:20:30", "%Y-%m-%d %H:%M:%S"), Utc).unwrap(),
            utc(2007, 3, 24, 10, 20, 30)
        );
        assert!(Moment::new_in(Parts::ymd(2009, 2, 30), Utc).is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            Moment::parse_in("14 Feb 2009", "%d %b %Y", Utc).unwrap(),
            utc(2009, 2, 14, 0, 0, 0)
        );
        let missing = Moment::parse_in("14 Feb 2009", "", Utc);
        assert!(matches!(missing, Err(Error::InvalidInput(m)) if m.contains("missing format")));
        assert!(Moment::parse_in("14 Feb 2009", "%Y-%m-%d", Utc).is_err());
    }

    #[test]
    fn test_parse_keeps_partial_time() {
        assert_eq!(
            Moment::parse_in("2009-02-14 10", "%Y-%m-%d %H", Utc).unwrap(),
            utc(2009, 2, 14, 10, 0, 0)
        );
        assert_eq!(
            Moment::parse_in("2009-02-14 10:20", "%Y-%m-%d %H:%M", Utc).unwrap(),
            utc(2009, 2, 14, 10, 20, 0)
        );
        assert_eq!(
            Moment::parse_in("2009-02", "%Y-%m", Utc).unwrap(),
            utc(2009, 2, 1, 0, 0, 0)
        );
        // Minutes without an hour, or a 12-hour clock without AM/PM.
        assert!(Moment::parse_in("2009-02-14 20", "%Y-%m-%d %M", Utc).is_err());
        assert!(Moment::parse_in("2009-02-14 10", "%Y-%m-%d %I", Utc).is_err());
        assert!(Moment::parse_in("abc", "abc", Utc).is_err());
    }

    #[test]
    fn test_parse_honours_offset() {
        let m = Moment::parse_in("2009-02-14 04:31:30 +0500", "%Y-%m-%d %H:%M:%S %z", Utc).unwrap();
        assert_eq!(m.timestamp(), 1234567890.0);
        assert_eq!(m, utc(2009, 2, 13, 23, 31, 30));
        let local = Moment::parse_in("2009-02-14 00:31:30 +0100", "%Y-%m-%d %H:%M:%S %z", plus_one())
            .unwrap();
        assert_eq!(local.to_string(), "Moment(2009-02-14, 00:31:30)");
        assert_eq!(
            Moment::parse_in("1234567890", "%s", plus_one()).unwrap(),
            local
        );
    }

    #[test]
    fn test_parse_time_only_uses_today() {
        let _clock = ScopedEvaluationInstant::new(utc(2010, 6, 15, 8, 0, 0).datetime());
        assert_eq!(
            Moment::parse_in("11:02:45", "%H:%M:%S", Utc).unwrap(),
            utc(2010, 6, 15, 11, 2, 45)
        );
    }

    #[test]
    fn test_field_setters_roll_over() {
        let mut d = Moment::from_timestamp_in(123456.0, Utc).unwrap();
        assert_eq!(d.to_string(), "Moment(1970-01-02, 10:17:36)");
        d.set_year(i64::from(d.year()) + 10);
        assert_eq!(d.to_string(), "Moment(1980-01-02, 10:17:36)");
        d.set_month(6);
        assert_eq!(d.to_string(), "Moment(1980-06-02, 10:17:36)");
        d.set_day(i64::from(d.day()) + 256);
        assert_eq!(d.to_string(), "Moment(1981-02-13, 10:17:36)");
        assert_eq!((d.day(), d.month(), d.year()), (13, 2, 1981));
    }

    #[test]
    fn test_setters_follow_delta_rule() {
        let mut m = utc(2009, 2, 14, 0, 31, 30);
        m.set_day(0);
        assert_eq!(m, utc(2009, 1, 31, 0, 31, 30));
        m.set_month(13);
        assert_eq!(m, utc(2010, 1, 31, 0, 31, 30));
        m.set_month(0);
        assert_eq!(m, utc(2009, 12, 31, 0, 31, 30));
        m.set_hour(-1);
        assert_eq!(m, utc(2009, 12, 30, 23, 31, 30));
        m.set_minute(5).set_second(75);
        assert_eq!(m, utc(2009, 12, 30, 23, 6, 15));
    }

    #[test]
    fn test_month_clamps_day() {
        let mut m = utc(2009, 1, 31, 12, 0, 0);
        m.set_month(2);
        assert_eq!(m, utc(2009, 2, 28, 12, 0, 0));
        let mut leap = utc(2004, 2, 29, 0, 0, 0);
        leap.set_year(2005);
        assert_eq!(leap, utc(2005, 2, 28, 0, 0, 0));
    }

    #[test]
    fn test_week_and_weekday() {
        let mut m = Moment::from_timestamp_in(1234567890.0, plus_one()).unwrap();
        assert_eq!(m.week(), 6);
        assert_eq!(m.day_of_year(), 45);
        m.set_week(12);
        assert_eq!(m, cet(2009, 3, 28, 0, 31, 30));
        m.set_weekday(Weekday::Mon);
        assert_eq!(m, cet(2009, 3, 23, 0, 31, 30));
        m.set_weekday(Weekday::Sun);
        assert_eq!(m, cet(2009, 3, 29, 0, 31, 30));
    }

    #[test]
    fn test_add_chains() {
        let mut m = utc(2004, 1, 12, 0, 0, 0);
        m.add(Delta::new().months(1))
            .add(Delta::new().days(3).hours(25));
        assert_eq!(m, utc(2004, 2, 16, 1, 0, 0));
        m.shift(TimeUnit::Weeks, -1);
        assert_eq!(m, utc(2004, 2, 9, 1, 0, 0));
    }

    #[test]
    fn test_try_add_overflow_is_atomic() {
        let mut m = utc(2009, 2, 14, 0, 0, 0);
        let err = m.try_add(Delta::new().months(1).years(i64::MAX)).unwrap_err();
        assert!(matches!(err, Error::OutOfRange(_)));
        assert_eq!(m, utc(2009, 2, 14, 0, 0, 0));
    }

    #[test]
    fn test_try_set_reports_overflow() {
        let mut m = utc(2009, 2, 14, 0, 31, 30);
        let err = m.try_set(TimeUnit::Years, 300_000).unwrap_err();
        assert!(matches!(err, Error::OutOfRange(_)));
        assert!(m.try_set(TimeUnit::Days, i64::MAX).is_err());
        assert_eq!(m, utc(2009, 2, 14, 0, 31, 30));
        m.try_set(TimeUnit::Months, 13).unwrap();
        assert_eq!(m, utc(2010, 1, 14, 0, 31, 30));
    }

    #[test]
    #[should_panic(expected = "moment arithmetic overflow")]
    fn test_set_year_past_range_panics() {
        utc(2009, 2, 14, 0, 0, 0).set_year(300_000);
    }

    #[test]
    fn test_whole_view_setters() {
        let mut m = Moment::from_timestamp_in(1234567890.0, plus_one()).unwrap();
        m.set_date(NaiveDate::from_ymd_opt(2009, 3, 1).unwrap());
        assert_eq!(m, cet(2009, 3, 1, 0, 31, 30));
        m.set_time(NaiveTime::from_hms_opt(11, 2, 45).unwrap());
        assert_eq!(m, cet(2009, 3, 1, 11, 2, 45));
        m.set_parts((2009, 2, 14, 0, 31, 30)).unwrap();
        assert_eq!(m.timestamp(), 1234567890.0);
        assert!(m.set_parts((2009, 2, 30)).is_err());
        assert_eq!(m.timestamp(), 1234567890.0);
        m.set_timestamp(0.0).unwrap();
        assert_eq!(m, utc(1970, 1, 1, 0, 0, 0));
        assert_eq!(m.hour(), 1);
    }

    #[test]
    fn test_equality_across_zones() {
        let u = Moment::from_timestamp_in(1234567890.0, Utc).unwrap();
        assert_eq!(u, utc(2009, 2, 13, 23, 31, 30));
        assert_eq!(u.day_of_year(), 44);
        let east = FixedOffset::east_opt(5 * 3600).unwrap();
        let e = u.with_timezone(&east);
        assert_eq!(e, u);
        assert_eq!((e.day(), e.hour()), (14, 4));
        assert_eq!(e.utc(), u.naive());
        assert_eq!(e.to_utc().to_string(), u.to_string());
        assert_eq!(u.with_timezone(&plus_one()).to_string(), "Moment(2009-02-14, 00:31:30)");
    }

    #[test]
    fn test_ordering() {
        let a = Moment::from_timestamp_in(12345.0, Utc).unwrap();
        let b = Moment::from_timestamp_in(1234.0, Utc).unwrap();
        assert!(a > b);
        assert!(b < a);
        assert_eq!(a.clone().max(b.clone()), a);
    }

    #[test]
    fn test_operators() {
        let m = Moment::from_timestamp_in(1234567890.0, plus_one()).unwrap();
        let later = m.clone() + TimeDelta::days(2);
        assert_eq!(later, cet(2009, 2, 16, 0, 31, 30));
        assert_eq!(&later - &m, TimeDelta::days(2));
        assert_eq!(later.clone() - TimeDelta::days(2), m);
        let mut n = m.clone();
        n += TimeDelta::hours(1);
        n -= TimeDelta::minutes(30);
        assert_eq!(n - m, TimeDelta::minutes(30));
    }

    #[test]
    fn test_predicates_follow_clock() {
        let _clock = ScopedEvaluationInstant::new(utc(2009, 2, 14, 12, 0, 0).datetime());
        assert!(utc(2009, 2, 14, 23, 59, 59).is_today());
        assert!(utc(2009, 2, 14, 0, 0, 0).is_today());
        assert!(utc(2009, 2, 13, 23, 59, 59).is_past_date());
        assert!(utc(2009, 2, 15, 0, 0, 0).is_future_date());
        assert!(!utc(2009, 2, 15, 0, 0, 0).is_past_date());
        assert!(Moment::now_in(Utc).is_today());
    }

    #[test]
    fn test_ago_applies_years_months_days_in_order() {
        let _clock = ScopedEvaluationInstant::new(utc(2004, 3, 31, 9, 0, 0).datetime());
        let m = Moment::ago_in(Delta::new().months(1).days(-5), Utc).unwrap();
        // March 31 minus one month clamps to February 29, then five days on.
        assert_eq!(m, utc(2004, 3, 5, 9, 0, 0));
        let future = Moment::ago_in(Delta::new().days(-1), Utc).unwrap();
        assert!(future.is_future_date());
    }

    /// UTC+1, moving to UTC+2 from 2009-03-29 01:00 UTC until
    /// 2009-10-25 01:00 UTC.
    #[derive(Clone, Copy, Debug)]
    struct Summer;

    impl Summer {
        fn offset_at(utc: &NaiveDateTime) -> FixedOffset {
            let start = NaiveDate::from_ymd_opt(2009, 3, 29).unwrap().and_hms_opt(1, 0, 0).unwrap();
            let end = NaiveDate::from_ymd_opt(2009, 10, 25).unwrap().and_hms_opt(1, 0, 0).unwrap();
            let hours = if (start..end).contains(utc) { 2 } else { 1 };
            FixedOffset::east_opt(hours * 3600).unwrap()
        }
    }

    impl TimeZone for Summer {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            Summer
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            // Larger offset first: it maps to the earlier instant.
            let fits: Vec<FixedOffset> = [7200, 3600]
                .into_iter()
                .filter_map(FixedOffset::east_opt)
                .filter(|off| {
                    let utc = *local - TimeDelta::seconds(i64::from(off.local_minus_utc()));
                    Self::offset_at(&utc) == *off
                })
                .collect();
            match fits.as_slice() {
                [] => LocalResult::None,
                [only] => LocalResult::Single(*only),
                [earliest, latest] => LocalResult::Ambiguous(*earliest, *latest),
                _ => unreachable!(),
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            Self::offset_at(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            Self::offset_at(utc)
        }
    }

    fn wall(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_localize_moves_gap_times_forward() {
        let dt = localize(&Summer, wall(2009, 3, 29, 2, 30));
        assert_eq!(dt.naive_local(), wall(2009, 3, 29, 3, 30));
        assert_eq!(dt.naive_utc(), wall(2009, 3, 29, 1, 30));
        let m = Moment::from_naive_in(wall(2009, 3, 29, 2, 0), Summer);
        assert_eq!((m.hour(), m.minute()), (3, 0));
    }

    #[test]
    fn test_localize_takes_earliest_in_fold() {
        let dt = localize(&Summer, wall(2009, 10, 25, 2, 30));
        assert_eq!(dt.naive_local(), wall(2009, 10, 25, 2, 30));
        assert_eq!(dt.offset().local_minus_utc(), 7200);
        assert_eq!(dt.naive_utc(), wall(2009, 10, 25, 0, 30));
    }

    #[test]
    fn test_localize_plain_times() {
        let dt = localize(&Summer, wall(2009, 6, 1, 12, 0));
        assert_eq!(dt.naive_utc(), wall(2009, 6, 1, 10, 0));
        let naive = wall(2009, 3, 29, 2, 30);
        assert_eq!(localize(&Utc, naive).naive_utc(), naive);
    }

    #[test]
    fn test_day_steps_across_transition_are_elapsed() {
        let mut m = Moment::from_naive_in(wall(2009, 3, 28, 12, 0), Summer);
        m.add(Delta::new().days(1));
        assert_eq!((m.day(), m.hour()), (29, 13));
        let mut month = Moment::from_naive_in(wall(2009, 2, 28, 12, 0), Summer);
        month.set_month(3);
        assert_eq!((month.day(), month.hour()), (28, 12));
        let (start, end) = Moment::from_naive_in(wall(2009, 3, 29, 12, 0), Summer).day_tuple();
        assert_eq!(&end - &start, TimeDelta::hours(23) - TimeDelta::microseconds(1));
    }
}
