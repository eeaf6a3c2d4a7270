//! Timestamped console output. Progress goes to stdout, failures to stderr.

use chrono::{DateTime, Local};

/// Prefix for every log line: local time padded to a fixed column.
#[doc(hidden)]
pub fn stamp(msg: std::fmt::Arguments<'_>) -> String {
    format!("{:<30} : {}", Local::now(), msg)
}

/// Seconds since `since`, with microsecond precision.
#[doc(hidden)]
pub fn runtime_secs(since: DateTime<Local>) -> f64 {
    (Local::now() - since)
        .num_microseconds()
        .map(|n| n as f64 / 1_000_000.0)
        .unwrap_or(0.0)
}

/// Prints a progress line. Pass a start time first to append the elapsed runtime.
/// ```
/// use tracker_fetch::info_time;
/// info_time!("page {} of {}", 1, 2);
/// let start = chrono::Local::now();
/// info_time!(start, "done after {} pages", 2);
/// ```
#[macro_export]
macro_rules! info_time {
    ($strfm:literal $(,)? $($arg:expr),*) => {{
        println!("{}", $crate::macros::stamp(format_args!($strfm, $($arg),*)));
    }};
    ($time:expr, $strfm:literal $(,)? $($arg:expr),*) => {{
        let line = $crate::macros::stamp(format_args!($strfm, $($arg),*));
        println!("{}\nRUNTIME: {} sec", line, $crate::macros::runtime_secs($time));
    }};
}

/// `info_time!` for things that went wrong, written to stderr.
#[macro_export]
macro_rules! warn_time {
    ($strfm:literal $(,)? $($arg:expr),*) => {{
        eprintln!("{}", $crate::macros::stamp(format_args!($strfm, $($arg),*)));
    }};
}
