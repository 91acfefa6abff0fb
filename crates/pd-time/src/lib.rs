//! # pd-time
//!
//! The [`Moment`] value type: one instant, with writable calendar fields,
//! period boundaries, conversions to and from chrono, and a handful of
//! fixed string forms.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Start/end of day, week, month and year; month lengths.
pub mod bounds;

/// `Delta` — a calendar offset across several units.
pub mod delta;

/// String views and `Display`.
pub mod format;

/// Constructor inputs: `Parts` and `Input`.
pub mod input;

/// `Moment` — construction, field access, mutation, conversion.
pub mod moment;

/// `TimeUnit` — years, months, weeks, days, ...
pub mod time_unit;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use bounds::{days_in_month, is_leap_year, WEEK_START};
pub use delta::Delta;
pub use input::{Input, Parts};
pub use moment::{Moment, UtcMoment};
pub use time_unit::TimeUnit;
