use chrono::{DateTime, SecondsFormat, Utc};

/// Current instant as an ISO-8601 UTC string with millisecond precision and a
/// literal `Z` suffix, e.g. `2020-06-08T18:41:33.207Z`.
pub fn now_utc() -> String {
    format_utc(Utc::now())
}

pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
