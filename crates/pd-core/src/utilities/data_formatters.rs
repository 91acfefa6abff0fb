//! Text formatting helpers used by the `Moment` string views.
//!
//! chrono's strftime covers every field we print except the English ordinal
//! suffix on the day of the month, and we quote SQL literals ourselves.

/// Return the English ordinal suffix for `n` (e.g. `1` → `"st"`, `2` → `"nd"`).
///
/// `11`, `12` and `13` (and `111`, `112`, ...) take `"th"`.
pub fn ordinal_suffix(n: u32) -> &'static str {
    match n % 100 {
        11..=13 => "th",
        _ => match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// Format a number with its ordinal suffix (e.g. `1` → `"1st"`, `22` → `"22nd"`).
pub fn format_ordinal(n: u32) -> String {
    format!("{n}{}", ordinal_suffix(n))
}

/// Wrap `text` in single quotes for direct embedding in an SQL statement.
///
/// Embedded single quotes are doubled, as SQL string literals require.
pub fn sql_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
