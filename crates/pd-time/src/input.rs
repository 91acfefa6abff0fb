//! Constructor inputs: the broken-down [`Parts`] record and the [`Input`]
//! tagged union accepted by [`Moment::new`](crate::Moment::new).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use pd_core::errors::{Error, Result};

use crate::delta::Delta;

/// Broken-down calendar fields.
///
/// ```
/// use pd_time::Parts;
/// let p = Parts::ymd(2009, 2, 14).hms(0, 31, 30);
/// assert_eq!(p.to_naive().unwrap().to_string(), "2009-02-14 00:31:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parts {
    /// Proleptic Gregorian year.
    pub year: i32,
    /// Month (1–12).
    pub month: u32,
    /// Day of the month (1–31).
    pub day: u32,
    /// Hour (0–23).
    pub hour: u32,
    /// Minute (0–59).
    pub minute: u32,
    /// Second (0–59).
    pub second: u32,
    /// Microsecond (0–999 999).
    pub microsecond: u32,
}

impl Parts {
    /// Midnight of the given date.
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        Parts {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            microsecond: 0,
        }
    }

    /// Replace the time of day.
    pub fn hms(mut self, hour: u32, minute: u32, second: u32) -> Self {
        self.hour = hour;
        self.minute = minute;
        self.second = second;
        self
    }

    /// Replace the microsecond.
    pub fn micro(mut self, microsecond: u32) -> Self {
        self.microsecond = microsecond;
        self
    }

    /// Validate the fields and assemble a wall-clock value.
    ///
    /// # Errors
    /// `InvalidInput` when the fields do not name a real date and time
    /// (month 13, February 30, hour 24, ...).
    pub fn to_naive(&self) -> Result<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            Error::InvalidInput(format!(
                "no such date {}-{:02}-{:02}",
                self.year, self.month, self.day
            ))
        })?;
        let time = NaiveTime::from_hms_micro_opt(self.hour, self.minute, self.second, self.microsecond)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "no such time {:02}:{:02}:{:02}.{:06}",
                    self.hour, self.minute, self.second, self.microsecond
                ))
            })?;
        Ok(date.and_time(time))
    }
}

impl From<(i32, u32, u32)> for Parts {
    fn from((year, month, day): (i32, u32, u32)) -> Self {
        Parts::ymd(year, month, day)
    }
}

impl From<(i32, u32, u32, u32, u32, u32)> for Parts {
    fn from((year, month, day, hour, minute, second): (i32, u32, u32, u32, u32, u32)) -> Self {
        Parts::ymd(year, month, day).hms(hour, minute, second)
    }
}

impl From<(i32, u32, u32, u32, u32, u32, u32)> for Parts {
    fn from(
        (year, month, day, hour, minute, second, microsecond): (i32, u32, u32, u32, u32, u32, u32),
    ) -> Self {
        Parts::ymd(year, month, day)
            .hms(hour, minute, second)
            .micro(microsecond)
    }
}

/// Everything a [`Moment`](crate::Moment) can be built from.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// The current instant.
    Now,
    /// Seconds since the Unix epoch; fractional seconds are kept to the
    /// microsecond.
    Timestamp(f64),
    /// A wall-clock date and time in the target zone.
    DateTime(NaiveDateTime),
    /// A date; the time is midnight.
    Date(NaiveDate),
    /// A time of day; the date is today.
    Time(NaiveTime),
    /// Broken-down calendar fields.
    Parts(Parts),
    /// Text parsed with a strftime-style pattern.
    Formatted {
        /// The text to parse.
        input: String,
        /// The pattern it is written in.
        pattern: String,
    },
    /// Now, moved back by the offset (negative components move forward).
    Ago(Delta),
}

impl From<i32> for Input {
    fn from(ts: i32) -> Self {
        Input::Timestamp(f64::from(ts))
    }
}

impl From<i64> for Input {
    fn from(ts: i64) -> Self {
        Input::Timestamp(ts as f64)
    }
}

impl From<f64> for Input {
    fn from(ts: f64) -> Self {
        Input::Timestamp(ts)
    }
}

impl From<NaiveDateTime> for Input {
    fn from(dt: NaiveDateTime) -> Self {
        Input::DateTime(dt)
    }
}

impl From<NaiveDate> for Input {
    fn from(d: NaiveDate) -> Self {
        Input::Date(d)
    }
}

impl From<NaiveTime> for Input {
    fn from(t: NaiveTime) -> Self {
        Input::Time(t)
    }
}

impl From<Parts> for Input {
    fn from(p: Parts) -> Self {
        Input::Parts(p)
    }
}

impl From<Delta> for Input {
    fn from(d: Delta) -> Self {
        Input::Ago(d)
    }
}

impl From<(&str, &str)> for Input {
    fn from((input, pattern): (&str, &str)) -> Self {
        Input::Formatted {
            input: input.to_owned(),
            pattern: pattern.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_validate() {
        assert!(Parts::ymd(2004, 2, 29).to_naive().is_ok());
        assert!(Parts::ymd(2009, 2, 29).to_naive().is_err());
        assert!(Parts::ymd(2009, 13, 1).to_naive().is_err());
        assert!(Parts::ymd(2009, 1, 1).hms(24, 0, 0).to_naive().is_err());
        assert!(Parts::ymd(2009, 1, 1).micro(1_000_000).to_naive().is_err());
    }

    #[test]
    fn test_parts_from_tuples() {
        assert_eq!(Parts::from((2009, 2, 14)), Parts::ymd(2009, 2, 14));
        assert_eq!(
            Parts::from((2009, 2, 14, 0, 31, 30, 250)),
            Parts::ymd(2009, 2, 14).hms(0, 31, 30).micro(250)
        );
    }

    #[test]
    fn test_input_conversions() {
        assert_eq!(Input::from(1234567890), Input::Timestamp(1234567890.0));
        assert_eq!(Input::from(12.5), Input::Timestamp(12.5));
        assert_eq!(
            Input::from(("14/02/2009", "%d/%m/%Y")),
            Input::Formatted {
                input: "14/02/2009".into(),
                pattern: "%d/%m/%Y".into()
            }
        );
    }
}
