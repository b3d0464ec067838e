//! Data models for the Ogiri board.
//!
//! Field names match the JSON wire format and the durable store's file layout.

mod answer;
mod theme;

pub use answer::*;
pub use theme::*;

use chrono::{DateTime, Duration, Utc};

/// Timestamp for a mutation of a record last stamped at `previous`.
///
/// Never returns a value at or before `previous`, even when the clock is coarse
/// or has stepped backwards.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Returns the value only when it carries non-whitespace content.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
