use crate::aggregate::{self, SymptomFrequency, TrendPoint};
use crate::config::EngineConfig;
use crate::entry::SymptomLogEntry;
use crate::severity::severity_in_range;
use crate::store::{LogStore, RecentQuery, StorageError};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLine {
    pub id: Uuid,
    pub symptoms_label: String,
    pub detail: String,
    /// Set for scores outside 1-10; such scores are still displayed.
    pub severity_out_of_range: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerOverview {
    pub total_logs: usize,
    pub average_severity: f64,
    pub trend: Vec<TrendPoint>,
    pub top_symptoms: Vec<SymptomFrequency>,
    pub recent_activity: Vec<ActivityLine>,
}

pub fn activity_line<Tz>(entry: &SymptomLogEntry, tz: &Tz) -> ActivityLine
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let when = entry.created_at.with_timezone(tz).format("%b %-d, %-I:%M %p");
    ActivityLine {
        id: entry.id,
        symptoms_label: format!("Logged symptoms: {}", entry.symptoms.join(", ")),
        detail: format!("Severity: {}/10 • {}", entry.severity, when),
        severity_out_of_range: !severity_in_range(entry.severity),
    }
}

/// Assembles the overview from already fetched records. `history` feeds the
/// statistics, `recent` the activity list; both newest first.
pub fn build_overview<Tz>(
    history: &[SymptomLogEntry],
    recent: &[SymptomLogEntry],
    total_logs: usize,
    config: &EngineConfig,
    now: &DateTime<Tz>,
) -> TrackerOverview
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tz = now.timezone();
    TrackerOverview {
        total_logs,
        average_severity: aggregate::compute_average_severity(history),
        trend: aggregate::compute_daily_trend_at(history, config.window_days, now),
        top_symptoms: aggregate::compute_top_symptoms(history, config.top_n),
        recent_activity: recent.iter().map(|e| activity_line(e, &tz)).collect(),
    }
}

pub async fn load_overview<S, Tz>(
    store: &S,
    user_id: &str,
    config: &EngineConfig,
    now: &DateTime<Tz>,
) -> Result<TrackerOverview, StorageError>
where
    S: LogStore + ?Sized,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let total_logs = store.count(user_id).await?;
    let history = store
        .query_recent(user_id, &RecentQuery::latest(config.tracker_history_limit))
        .await?;
    let recent = if config.recent_activity_limit <= history.len() {
        history[..config.recent_activity_limit].to_vec()
    } else {
        store
            .query_recent(user_id, &RecentQuery::latest(config.recent_activity_limit))
            .await?
    };
    Ok(build_overview(&history, &recent, total_logs, config, now))
}
