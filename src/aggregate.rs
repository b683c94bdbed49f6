use crate::entry::SymptomLogEntry;
use ahash::AHashMap;
use chrono::{DateTime, Days, NaiveDate, TimeZone};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub label: String, // "Oct 17"
    pub mean_severity: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomFrequency {
    pub symptom: String,
    pub count: usize,
}

/// One point per calendar day for the `window_days` days ending at
/// `reference_date` (inclusive), oldest first. Records are assigned to days
/// by their creation time in `tz`. Empty days report `0.0` and `0`.
pub fn compute_daily_trend<Tz: TimeZone>(
    records: &[SymptomLogEntry],
    window_days: usize,
    reference_date: NaiveDate,
    tz: &Tz,
) -> Vec<TrendPoint> {
    if window_days == 0 {
        return vec![];
    }
    // Bucketize (severity sum, count) per local day
    let mut buckets: BTreeMap<NaiveDate, (i64, usize)> = BTreeMap::new();
    for r in records {
        let day = r.created_at.with_timezone(tz).date_naive();
        let b = buckets.entry(day).or_insert((0, 0));
        b.0 += i64::from(r.severity);
        b.1 += 1;
    }

    (0..window_days as u64)
        .rev()
        .filter_map(|offset| reference_date.checked_sub_days(Days::new(offset)))
        .map(|date| {
            let (sum, count) = buckets.get(&date).copied().unwrap_or((0, 0));
            let mean_severity = if count > 0 {
                round_one_decimal(sum as f64 / count as f64)
            } else {
                0.0
            };
            TrendPoint { date, label: date.format("%b %d").to_string(), mean_severity, count }
        })
        .collect()
}

/// Trend window ending on the calendar day of `now`, in `now`'s own zone.
pub fn compute_daily_trend_at<Tz: TimeZone>(
    records: &[SymptomLogEntry],
    window_days: usize,
    now: &DateTime<Tz>,
) -> Vec<TrendPoint> {
    compute_daily_trend(records, window_days, now.date_naive(), &now.timezone())
}

/// Most frequent symptom labels across all records. Labels are compared
/// exactly; ties keep first-seen order.
pub fn compute_top_symptoms(records: &[SymptomLogEntry], top_n: usize) -> Vec<SymptomFrequency> {
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut counts: Vec<SymptomFrequency> = Vec::new();
    for symptom in records.iter().flat_map(|r| r.symptoms.iter()) {
        match index.get(symptom.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(symptom.as_str(), counts.len());
                counts.push(SymptomFrequency { symptom: symptom.clone(), count: 1 });
            }
        }
    }
    // sorted_by is stable
    counts
        .into_iter()
        .sorted_by(|a, b| b.count.cmp(&a.count))
        .take(top_n)
        .collect()
}

pub fn compute_average_severity(records: &[SymptomLogEntry]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: i64 = records.iter().map(|r| i64::from(r.severity)).sum();
    round_one_decimal(sum as f64 / records.len() as f64)
}

/// Rounds to one decimal place, halves toward positive infinity.
pub fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0 + 0.5).floor() / 10.0
}
