//! String views of a `Moment`.
//!
//! | view            | example                       |
//! |-----------------|-------------------------------|
//! | `friendly`      | `14 Feb 2009`                 |
//! | `fancy`         | `February 14th, 2009`         |
//! | `fancy_no_year` | `February 14th`               |
//! | `sql`           | `'2009-02-14 00:31:30'`       |
//! | `sql_date`      | `2009-02-14`                  |
//! | `sql_time`      | `00:31:30`                    |
//! | `Display`       | `Moment(2009-02-14, 00:31:30)`|
//!
//! Anything else goes through [`Moment::format`], which takes chrono's
//! strftime patterns.

use std::fmt::{self, Write};

use chrono::format::{Item, StrftimeItems};
use chrono::TimeZone;
use pd_core::errors::Result;
use pd_core::utilities::{format_ordinal, sql_quote};
use pd_core::ensure;

use crate::moment::Moment;

impl<Tz: TimeZone> Moment<Tz>
where
    Tz::Offset: fmt::Display,
{
    // Only for the fixed patterns below, which chrono always accepts.
    fn render(&self, pattern: &'static str) -> String {
        self.dt.format(pattern).to_string()
    }

    /// Format with a strftime-style pattern.
    ///
    /// ```
    /// use chrono::FixedOffset;
    /// use pd_time::Moment;
    /// let cet = FixedOffset::east_opt(3600).unwrap();
    /// let m = Moment::from_timestamp_in(1234567890.0, cet).unwrap();
    /// assert_eq!(m.format("%Y-%m-%d, %H:%M:%S").unwrap(), "2009-02-14, 00:31:30");
    /// assert!(m.format("%Q").is_err());
    /// ```
    ///
    /// # Errors
    /// `InvalidInput` if the pattern is malformed.
    pub fn format(&self, pattern: &str) -> Result<String> {
        let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
        ensure!(
            !items.iter().any(|item| matches!(item, Item::Error)),
            "malformed format pattern {pattern:?}"
        );
        let mut out = String::new();
        let written = write!(out, "{}", self.dt.format_with_items(items.iter()));
        ensure!(written.is_ok(), "pattern {pattern:?} cannot format this moment");
        Ok(out)
    }

    /// Short day-month-year form, e.g. `14 Feb 2009`.
    pub fn friendly(&self) -> String {
        self.render("%d %b %Y")
    }

    /// Spelled-out month with an ordinal day, e.g. `February 14th, 2009`.
    pub fn fancy(&self) -> String {
        format!("{}, {}", self.fancy_no_year(), self.render("%Y"))
    }

    /// [`fancy`](Self::fancy) without the year, e.g. `February 14th`.
    pub fn fancy_no_year(&self) -> String {
        format!("{} {}", self.render("%B"), format_ordinal(self.day()))
    }

    /// A quoted SQL timestamp literal, e.g. `'2009-02-14 00:31:30'`.
    pub fn sql(&self) -> String {
        sql_quote(&self.render("%Y-%m-%d %H:%M:%S"))
    }

    /// The SQL date part, e.g. `2009-02-14`.
    pub fn sql_date(&self) -> String {
        self.render("%Y-%m-%d")
    }

    /// The SQL time part, e.g. `00:31:30`.
    pub fn sql_time(&self) -> String {
        self.render("%H:%M:%S")
    }
}

impl<Tz: TimeZone> fmt::Display for Moment<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Moment({})", self.dt.format("%Y-%m-%d, %H:%M:%S"))
    }
}

impl<Tz: TimeZone> fmt::Debug for Moment<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
