//! Parsing of human-written age thresholds such as `5m`, `30s` or `7d`.

use crate::error::AgeParseError;
use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;

static AGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)([smd])").expect("age pattern is a valid regex"));

/// Parses the first `<integer><unit>` occurrence in `age`, where unit is one of
/// `s` (seconds), `m` (minutes) or `d` (days).
///
/// The pattern is searched for anywhere in the input, so `"min age: 15m"` parses
/// as fifteen minutes and `"12h3m"` as three minutes.
pub fn parse_age(age: &str) -> Result<Duration, AgeParseError> {
    let caps = AGE_PATTERN
        .captures(age)
        .ok_or_else(|| AgeParseError::NoMatch(age.to_string()))?;
    let out_of_range = || AgeParseError::OutOfRange(caps[0].to_string());

    let count: i64 = caps[1].parse().map_err(|_| out_of_range())?;
    let delta = match &caps[2] {
        "s" => Duration::try_seconds(count),
        "m" => Duration::try_minutes(count),
        "d" => Duration::try_days(count),
        unit => unreachable!("age pattern matched unknown unit {unit:?}"),
    };

    delta.ok_or_else(out_of_range)
}
