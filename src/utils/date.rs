use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Parse an ISO-8601 date or datetime string and truncate it to the calendar
/// day. Accepts "YYYY-MM-DD", a naive datetime, or a full RFC 3339 timestamp.
pub fn normalize_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    None
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
