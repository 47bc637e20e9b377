// src/data/datetime.rs

//! Functions to parse the `ts` timestamp of a [`LogEntry`].
//!
//! A timestamp is RFC 3339 with fractional seconds, e.g.
//! `2018-01-01T00:00:00.123456789Z` or `2018-01-01T00:00:00.5+01:00`.
//!
//! [`LogEntry`]: crate::data::subrecord::LogEntry

#[doc(hidden)]
pub use ::chrono::{
    DateTime,
    FixedOffset,
};
use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::thiserror::Error;

/// A datetime with a timezone offset.
pub type DateTimeL = DateTime<FixedOffset>;
pub type DateTimeLOpt = Option<DateTimeL>;

/// The timezone of a timestamp is either `Z` for UTC or `+HH:MM`, `-HH:MM`.
pub const TIMEZONE_PATTERN: &str = r"(Z|[+\-]\d{2}:\d{2})";

/// The only accepted timestamp pattern.
///
/// The nanoseconds quantifier is a range because RFC 3339 nanosecond
/// formatting truncates trailing zeros.
pub const DATE_FORMAT_PATTERN: &str = const_format::concatcp!(
    // YYYY-MM-DD
    r"\d{4}-\d{2}-\d{2}",
    // time separator
    "T",
    // HH:MM:SS
    r"\d{2}:\d{2}:\d{2}",
    // fractional seconds separator
    r"\.",
    // nanoseconds
    r"\d{1,9}",
    TIMEZONE_PATTERN,
);

lazy_static! {
    /// Compiled `DATE_FORMAT_PATTERN`, anchored at both ends.
    static ref DATE_FORMAT_RE: Regex = {
        defñ!("lazy_static! DATE_FORMAT_RE");
        Regex::new(const_format::concatcp!("^", DATE_FORMAT_PATTERN, "$"))
            .expect("DATE_FORMAT_PATTERN is a valid regex")
    };
}

/// Errors of [`parse_time`].
#[derive(Debug, Error)]
pub enum ParseTimeError {
    #[error("need time string")]
    Empty,
    #[error("cannot parse time {time:?}: {source}")]
    Parse {
        time: String,
        #[source]
        source: ::chrono::ParseError,
    },
    #[error("expected time in format {pattern:?}, got {time:?}")]
    Format {
        time: String,
        pattern: &'static str,
    },
}

/// Convert `time` into a [`DateTimeL`].
///
/// chrono's RFC 3339 parser also accepts timestamps without fractional
/// seconds, a space or lowercase `t` as date-time separator, and a
/// lowercase `z`. So the `time` is also checked against
/// [`DATE_FORMAT_PATTERN`].
pub fn parse_time(time: &str) -> Result<DateTimeL, ParseTimeError> {
    defn!("({:?})", time);
    if time.is_empty() {
        defx!("empty");
        return Err(ParseTimeError::Empty);
    }
    let dt: DateTimeL = match DateTime::parse_from_rfc3339(time) {
        Ok(val) => val,
        Err(source) => {
            defx!("parse_from_rfc3339 error {}", source);
            return Err(ParseTimeError::Parse {
                time: String::from(time),
                source,
            });
        }
    };
    if !DATE_FORMAT_RE.is_match(time) {
        defx!("DATE_FORMAT_RE did not match");
        return Err(ParseTimeError::Format {
            time: String::from(time),
            pattern: DATE_FORMAT_PATTERN,
        });
    }
    defx!("return {:?}", dt);

    Ok(dt)
}
