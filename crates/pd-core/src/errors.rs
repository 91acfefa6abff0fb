//! Error types for paodate.
//!
//! Construction is the only place where bad input can enter a `Moment`, so
//! the taxonomy is small: `InvalidInput` for anything a caller handed us that
//! cannot describe an instant, and `OutOfRange` for checked arithmetic that
//! leaves chrono's representable range. The `ensure!` and `fail!` macros
//! produce `InvalidInput`.

use thiserror::Error;

/// The error type used throughout paodate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The constructor input cannot be turned into an instant.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Checked arithmetic left the representable date/time range.
    #[error("out of range: {0}")]
    OutOfRange(String),
}

/// Shorthand `Result` type used throughout paodate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidInput(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use pd_core::{ensure, errors::Error};
/// fn finite(x: f64) -> pd_core::errors::Result<f64> {
///     ensure!(x.is_finite(), "timestamp must be finite, got {x}");
///     Ok(x)
/// }
/// assert!(finite(1.0).is_ok());
/// assert_eq!(
///     finite(f64::NAN),
///     Err(Error::InvalidInput("timestamp must be finite, got NaN".into()))
/// );
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidInput(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::InvalidInput(...))` immediately.
///
/// # Example
/// ```
/// use pd_core::{fail, errors::Error};
/// fn always_err() -> pd_core::errors::Result<()> {
///     fail!("missing format");
/// }
/// assert_eq!(always_err(), Err(Error::InvalidInput("missing format".into())));
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::InvalidInput(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let e = Error::InvalidInput("missing format".into());
        assert_eq!(e.to_string(), "invalid input: missing format");
        let e = Error::OutOfRange("year 300000".into());
        assert_eq!(e.to_string(), "out of range: year 300000");
    }

    #[test]
    fn macros_short_circuit() {
        fn check(n: i32) -> Result<i32> {
            ensure!(n > 0, "n must be positive, got {n}");
            if n > 10 {
                fail!("n too large: {n}");
            }
            Ok(n)
        }
        assert_eq!(check(3), Ok(3));
        assert!(matches!(check(-1), Err(Error::InvalidInput(m)) if m.contains("-1")));
        assert!(matches!(check(11), Err(Error::InvalidInput(m)) if m == "n too large: 11"));
    }
}
