use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use symptomscope::config::EngineConfig;
use symptomscope::entry::SymptomLogEntry;
use symptomscope::overview::{activity_line, build_overview, load_overview};
use symptomscope::store::{LogStore, MemoryLogStore};
use uuid::Uuid;

fn entry(symptoms: &[&str], severity: i32, created_at: DateTime<Utc>) -> SymptomLogEntry {
    SymptomLogEntry {
        id: Uuid::new_v4(),
        user_id: "u1".into(),
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        severity,
        notes: None,
        ai_response: None,
        created_at,
    }
}

#[test]
fn activity_line_formats_like_the_dashboard() {
    let e = entry(&["pain", "back pain"], 7, Utc.with_ymd_and_hms(2024, 10, 17, 15, 4, 0).unwrap());
    let line = activity_line(&e, &Utc);
    assert_eq!(line.symptoms_label, "Logged symptoms: pain, back pain");
    assert_eq!(line.detail, "Severity: 7/10 • Oct 17, 3:04 PM");
    assert!(!line.severity_out_of_range);
    assert_eq!(line.id, e.id);
}

#[test]
fn activity_line_uses_local_time_and_flags_wide_scores() {
    let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
    let e = entry(&["fever"], 57, Utc.with_ymd_and_hms(2024, 10, 17, 3, 30, 0).unwrap());
    let line = activity_line(&e, &minus_five);
    assert_eq!(line.detail, "Severity: 57/10 • Oct 16, 10:30 PM");
    assert!(line.severity_out_of_range);
}

#[test]
fn empty_overview_is_zero_filled() {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    let out = build_overview(&[], &[], 0, &EngineConfig::default(), &now);
    assert_eq!(out.total_logs, 0);
    assert_eq!(out.average_severity, 0.0);
    assert_eq!(out.trend.len(), 7);
    assert!(out.trend.iter().all(|p| p.count == 0 && p.mean_severity == 0.0));
    assert!(out.top_symptoms.is_empty());
    assert!(out.recent_activity.is_empty());
}

#[tokio::test]
async fn overview_from_store() {
    let store = MemoryLogStore::new();
    let base = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
    for i in 0..8 {
        let symptoms: &[&str] = if i % 2 == 0 { &["pain", "fatigue"] } else { &["pain"] };
        let created = base - chrono::Duration::hours(12 * i);
        store.append(entry(symptoms, 2 + (i as i32 % 3), created)).await.unwrap();
    }
    let mut other = entry(&["cough"], 9, base);
    other.user_id = "u2".into();
    store.append(other).await.unwrap();

    let now = Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap();
    let out = load_overview(&store, "u1", &EngineConfig::default(), &now).await.unwrap();

    assert_eq!(out.total_logs, 8);
    assert_eq!(out.recent_activity.len(), 5);
    assert!(out.recent_activity[0].detail.ends_with("Mar 10, 8:00 AM"));
    assert_eq!(out.top_symptoms[0].symptom, "pain");
    assert_eq!(out.top_symptoms[0].count, 8);
    assert_eq!(out.top_symptoms[1].symptom, "fatigue");
    assert_eq!(out.top_symptoms[1].count, 4);
    assert_eq!(out.trend.len(), 7);
    let counted: usize = out.trend.iter().map(|p| p.count).sum();
    assert_eq!(counted, 8);
    // severities 2,3,4,2,3,4,2,3
    assert_eq!(out.average_severity, 2.9);
}

#[tokio::test]
async fn overview_respects_configured_limits() {
    let store = MemoryLogStore::new();
    let base = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
    for i in 0..6 {
        store.append(entry(&["cough"], 4, base - chrono::Duration::hours(i))).await.unwrap();
    }
    let config = EngineConfig { tracker_history_limit: 2, recent_activity_limit: 4, top_n: 1, ..Default::default() };
    let out = load_overview(&store, "u1", &config, &base).await.unwrap();
    assert_eq!(out.total_logs, 6);
    assert_eq!(out.recent_activity.len(), 4);
    assert_eq!(out.top_symptoms.len(), 1);
    assert_eq!(out.top_symptoms[0].count, 2);
}
