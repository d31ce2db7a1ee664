//! Display formatting for result values.

use std::ops::Range;

use chrono::{DateTime, Utc};

use super::Value;

/// Numbers in this range are rendered as calendar dates.
pub const TIMESTAMP_RANGE: Range<i64> = 1_000_000_000..10_000_000_000;

/// Renders a value for display.
///
/// Any number `N` with `1_000_000_000 <= N < 10_000_000_000` is read as Unix
/// epoch seconds and shown as a UTC `YYYY-MM-DD` date. The column type is not
/// consulted, so a plain integer in that range (a large id, a counter) is
/// shown as a date as well. Outside the range numbers print literally.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => epoch_date(*i).unwrap_or_else(|| i.to_string()),
        Value::Float(f) => float_as_epoch(*f)
            .and_then(epoch_date)
            .unwrap_or_else(|| f.to_string()),
        Value::String(s) => s.clone(),
        Value::Object(o) => o.to_string(),
    }
}

fn float_as_epoch(f: f64) -> Option<i64> {
    let lo = TIMESTAMP_RANGE.start as f64;
    let hi = TIMESTAMP_RANGE.end as f64;
    (f >= lo && f < hi).then(|| f.floor() as i64)
}

fn epoch_date(secs: i64) -> Option<String> {
    if !TIMESTAMP_RANGE.contains(&secs) {
        return None;
    }
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
}
