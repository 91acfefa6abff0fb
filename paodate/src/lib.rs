//! # paodate
//!
//! Date and time handling through a single value type, [`Moment`], that
//! unifies chrono's date, time, date-time and duration types.
//!
//! This crate is a **façade** that re-exports the public items of the
//! workspace crates. Application code should depend on this crate rather
//! than on `pd-core` / `pd-time` directly.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{FixedOffset, Utc};
//! use paodate::{Delta, Moment, Parts};
//!
//! let cet = FixedOffset::east_opt(3600).unwrap();
//! let m = Moment::from_timestamp_in(1234567890.0, cet).unwrap();
//! assert_eq!(m.to_string(), "Moment(2009-02-14, 00:31:30)");
//! assert_eq!(m.friendly(), "14 Feb 2009");
//! assert_eq!(m.sql(), "'2009-02-14 00:31:30'");
//!
//! let mut d = Moment::from_parts_in(Parts::ymd(2004, 1, 12), Utc).unwrap();
//! d.set_day(i64::from(d.day()) + 10);
//! assert_eq!(d.to_string(), "Moment(2004-01-22, 00:00:00)");
//!
//! let (start, end) = d.month_tuple();
//! assert_eq!(start.to_string(), "Moment(2004-01-01, 00:00:00)");
//! assert_eq!(end.to_string(), "Moment(2004-01-31, 23:59:59)");
//!
//! d.add(Delta::new().months(1).days(-1));
//! assert_eq!(d.fancy(), "February 21st, 2004");
//! ```
//!
//! Without a zone argument every constructor works in the local system
//! zone: `Moment::now()`, `Moment::new(1234567890)`,
//! `Moment::parse("14 Feb 2009", "%d %b %Y")`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Error definitions, the evaluation clock, and formatting helpers.
pub use pd_core as core;

/// The `Moment` type and its companions.
pub use pd_time as time;

pub use pd_core::{Error, Result, ScopedEvaluationInstant, Settings};
pub use pd_time::{
    days_in_month, is_leap_year, Delta, Input, Moment, Parts, TimeUnit, UtcMoment, WEEK_START,
};
