use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::RangeInclusive;

/// Severity stored when a chat message names symptoms but no score.
pub const DEFAULT_SEVERITY: i32 = 5;

/// Conventional severity scale. Values outside it are kept, only flagged.
pub const SEVERITY_RANGE: RangeInclusive<i32> = 1..=10;

static RE_SEVERITY: Lazy<Regex> = Lazy::new(|| {
    // Leftmost match wins; at one position the alternatives are tried in order.
    // ASCII digits only, no sign.
    Regex::new(r"(?i)([0-9]+)/10|([0-9]+) out of 10|severity ([0-9]+)").unwrap()
});

/// Pulls a numeric severity out of free text: `7/10`, `7 out of 10` or
/// `severity 7`. No range check is applied; `severity 57` yields 57.
pub fn parse_severity(message: &str) -> Option<i32> {
    let caps = RE_SEVERITY.captures(message)?;
    let digits = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))?
        .as_str();
    Some(saturating_parse(digits))
}

pub fn severity_in_range(value: i32) -> bool {
    SEVERITY_RANGE.contains(&value)
}

fn saturating_parse(digits: &str) -> i32 {
    let mut acc: i32 = 0;
    for b in digits.bytes() {
        acc = acc.saturating_mul(10).saturating_add(i32::from(b - b'0'));
    }
    acc
}
