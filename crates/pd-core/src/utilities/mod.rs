//! Miscellaneous utilities.

/// Text formatting helpers (ordinal suffixes, SQL literals).
pub mod data_formatters;

pub use data_formatters::{format_ordinal, ordinal_suffix, sql_quote};
