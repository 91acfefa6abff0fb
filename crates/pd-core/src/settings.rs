//! Library settings: the **evaluation clock**.
//!
//! Every notion of "now" in paodate (`Moment::now`, relative construction,
//! the `is_today` family of predicates) reads the clock through
//! [`Settings::now`]. By default that is the system clock; an evaluation
//! instant can be pinned instead, which makes date-relative code
//! reproducible.
//!
//! The override is stored per thread. Each test runs on its own thread, so a
//! test that pins the clock never leaks the pinned value into another one.
//! Prefer [`ScopedEvaluationInstant`], which restores the previous value when
//! dropped.

use std::cell::Cell;

use chrono::{DateTime, Utc};

thread_local! {
    static EVALUATION_INSTANT: Cell<Option<DateTime<Utc>>> = const { Cell::new(None) };
}

/// Access point for the evaluation clock.
pub struct Settings;

impl Settings {
    /// Return the current instant: the pinned evaluation instant if one has
    /// been set on this thread, otherwise the system clock.
    pub fn now() -> DateTime<Utc> {
        Self::evaluation_instant().unwrap_or_else(Utc::now)
    }

    /// Return the pinned evaluation instant, if any.
    pub fn evaluation_instant() -> Option<DateTime<Utc>> {
        EVALUATION_INSTANT.with(Cell::get)
    }

    /// Pin "now" to `instant` on the current thread.
    pub fn set_evaluation_instant(instant: DateTime<Utc>) {
        log::trace!("evaluation instant pinned to {instant}");
        EVALUATION_INSTANT.with(|cell| cell.set(Some(instant)));
    }

    /// Clear the pinned instant, going back to the system clock.
    pub fn reset_evaluation_instant() {
        log::trace!("evaluation instant reset to system clock");
        EVALUATION_INSTANT.with(|cell| cell.set(None));
    }
}

/// RAII guard that pins the evaluation instant and restores the previous
/// value (pinned or not) when dropped.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use pd_core::{ScopedEvaluationInstant, Settings};
///
/// let pinned = Utc.with_ymd_and_hms(2009, 2, 14, 0, 31, 30).unwrap();
/// {
///     let _guard = ScopedEvaluationInstant::new(pinned);
///     assert_eq!(Settings::now(), pinned);
/// }
/// assert_eq!(Settings::evaluation_instant(), None);
/// ```
#[must_use = "the evaluation instant is restored as soon as the guard is dropped"]
pub struct ScopedEvaluationInstant {
    previous: Option<DateTime<Utc>>,
}

impl ScopedEvaluationInstant {
    /// Pin the evaluation instant until the returned guard is dropped.
    pub fn new(instant: DateTime<Utc>) -> Self {
        let previous = Settings::evaluation_instant();
        Settings::set_evaluation_instant(instant);
        Self { previous }
    }
}

impl Drop for ScopedEvaluationInstant {
    fn drop(&mut self) {
        match self.previous {
            Some(instant) => Settings::set_evaluation_instant(instant),
            None => Settings::reset_evaluation_instant(),
        }
    }
}
