//! `TimeUnit` — the units a `Moment` can be shifted by.

/// A unit of time.
///
/// `Years` and `Months` are calendar units (their length depends on where
/// they are applied); everything from `Weeks` down is a fixed elapsed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeUnit {
    /// Calendar years (12 months).
    Years,
    /// Calendar months.
    Months,
    /// Weeks (7 days).
    Weeks,
    /// Days (24 hours).
    Days,
    /// Hours.
    Hours,
    /// Minutes.
    Minutes,
    /// Seconds.
    Seconds,
    /// Microseconds.
    Microseconds,
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnit::Years => write!(f, "Year(s)"),
            TimeUnit::Months => write!(f, "Month(s)"),
            TimeUnit::Weeks => write!(f, "Week(s)"),
            TimeUnit::Days => write!(f, "Day(s)"),
            TimeUnit::Hours => write!(f, "Hour(s)"),
            TimeUnit::Minutes => write!(f, "Minute(s)"),
            TimeUnit::Seconds => write!(f, "Second(s)"),
            TimeUnit::Microseconds => write!(f, "Microsecond(s)"),
        }
    }
}
