//! `Delta` — a signed calendar offset made of several [`TimeUnit`]
//! components.
//!
//! A `Delta` is the offset argument of [`Moment::add`](crate::Moment::add)
//! and of relative construction ([`Moment::ago`](crate::Moment::ago)).
//! Years and months are applied with calendar-correct addition; the
//! remaining components are folded into a single elapsed [`TimeDelta`].

use chrono::TimeDelta;

use crate::time_unit::TimeUnit;

/// A signed offset in years, months, days, hours, minutes, seconds and
/// microseconds.
///
/// Built with the chained setters:
///
/// ```
/// use pd_time::Delta;
/// let d = Delta::new().months(1).days(-5);
/// assert_eq!(d.to_string(), "1M-5D");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delta {
    /// Calendar years.
    pub years: i64,
    /// Calendar months.
    pub months: i64,
    /// Days.
    pub days: i64,
    /// Hours.
    pub hours: i64,
    /// Minutes.
    pub minutes: i64,
    /// Seconds.
    pub seconds: i64,
    /// Microseconds.
    pub microseconds: i64,
}

impl Delta {
    /// The empty offset.
    pub const ZERO: Delta = Delta {
        years: 0,
        months: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        microseconds: 0,
    };

    /// Create an empty offset.
    pub fn new() -> Self {
        Self::ZERO
    }

    /// An offset of `n` units. Weeks are stored as seven days each.
    pub fn of(n: i64, unit: TimeUnit) -> Self {
        let d = Self::ZERO;
        match unit {
            TimeUnit::Years => d.years(n),
            TimeUnit::Months => d.months(n),
            TimeUnit::Weeks => d.days(n.saturating_mul(7)),
            TimeUnit::Days => d.days(n),
            TimeUnit::Hours => d.hours(n),
            TimeUnit::Minutes => d.minutes(n),
            TimeUnit::Seconds => d.seconds(n),
            TimeUnit::Microseconds => d.microseconds(n),
        }
    }

    /// Set the years component.
    pub fn years(mut self, n: i64) -> Self {
        self.years = n;
        self
    }

    /// Set the months component.
    pub fn months(mut self, n: i64) -> Self {
        self.months = n;
        self
    }

    /// Set the days component.
    pub fn days(mut self, n: i64) -> Self {
        self.days = n;
        self
    }

    /// Set the hours component.
    pub fn hours(mut self, n: i64) -> Self {
        self.hours = n;
        self
    }

    /// Set the minutes component.
    pub fn minutes(mut self, n: i64) -> Self {
        self.minutes = n;
        self
    }

    /// Set the seconds component.
    pub fn seconds(mut self, n: i64) -> Self {
        self.seconds = n;
        self
    }

    /// Set the microseconds component.
    pub fn microseconds(mut self, n: i64) -> Self {
        self.microseconds = n;
        self
    }

    /// Return `true` if every component is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Reverse the direction of every component.
    pub fn negated(self) -> Self {
        Delta {
            years: self.years.saturating_neg(),
            months: self.months.saturating_neg(),
            days: self.days.saturating_neg(),
            hours: self.hours.saturating_neg(),
            minutes: self.minutes.saturating_neg(),
            seconds: self.seconds.saturating_neg(),
            microseconds: self.microseconds.saturating_neg(),
        }
    }

    /// The day-and-finer components as one elapsed duration.
    ///
    /// Returns `None` if the sum does not fit in a [`TimeDelta`].
    pub fn elapsed(&self) -> Option<TimeDelta> {
        TimeDelta::try_days(self.days)?
            .checked_add(&TimeDelta::try_hours(self.hours)?)?
            .checked_add(&TimeDelta::try_minutes(self.minutes)?)?
            .checked_add(&TimeDelta::try_seconds(self.seconds)?)?
            .checked_add(&TimeDelta::microseconds(self.microseconds))
    }

    /// The components in the order they are applied.
    pub fn components(&self) -> [(i64, TimeUnit); 7] {
        [
            (self.years, TimeUnit::Years),
            (self.months, TimeUnit::Months),
            (self.days, TimeUnit::Days),
            (self.hours, TimeUnit::Hours),
            (self.minutes, TimeUnit::Minutes),
            (self.seconds, TimeUnit::Seconds),
            (self.microseconds, TimeUnit::Microseconds),
        ]
    }
}

impl std::ops::Neg for Delta {
    type Output = Self;
    fn neg(self) -> Self {
        self.negated()
    }
}

impl From<TimeDelta> for Delta {
    fn from(span: TimeDelta) -> Self {
        let micros = span.subsec_nanos() as i64 / 1_000;
        Delta::new().seconds(span.num_seconds()).microseconds(micros)
    }
}

impl std::fmt::Display for Delta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0D");
        }
        for (n, unit) in self.components() {
            if n == 0 {
                continue;
            }
            let abbr = match unit {
                TimeUnit::Years => "Y",
                TimeUnit::Months => "M",
                TimeUnit::Weeks => "W",
                TimeUnit::Days => "D",
                TimeUnit::Hours => "h",
                TimeUnit::Minutes => "min",
                TimeUnit::Seconds => "s",
                TimeUnit::Microseconds => "us",
            };
            write!(f, "{n}{abbr}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Delta::new().to_string(), "0D");
        assert_eq!(Delta::of(3, TimeUnit::Months).to_string(), "3M");
        assert_eq!(Delta::new().years(1).days(-5).to_string(), "1Y-5D");
        assert_eq!(Delta::new().hours(2).minutes(30).to_string(), "2h30min");
    }

    #[test]
    fn test_weeks_are_days() {
        assert_eq!(Delta::of(2, TimeUnit::Weeks), Delta::new().days(14));
    }

    #[test]
    fn test_negation() {
        let d = Delta::new().years(1).months(-2).seconds(30);
        assert_eq!(-d, Delta::new().years(-1).months(2).seconds(-30));
        assert_eq!(-(-d), d);
    }

    #[test]
    fn test_elapsed_sums_fine_components() {
        let d = Delta::new().months(7).days(1).hours(2).seconds(3).microseconds(4);
        let expected = TimeDelta::days(1)
            + TimeDelta::hours(2)
            + TimeDelta::seconds(3)
            + TimeDelta::microseconds(4);
        assert_eq!(d.elapsed(), Some(expected));
        assert_eq!(Delta::new().days(i64::MAX).elapsed(), None);
    }

    #[test]
    fn test_from_time_delta() {
        let span = TimeDelta::seconds(90) + TimeDelta::microseconds(250);
        assert_eq!(Delta::from(span), Delta::new().seconds(90).microseconds(250));
        assert_eq!(Delta::from(span).elapsed(), Some(span));
    }
}
