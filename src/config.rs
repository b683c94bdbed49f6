use crate::severity::DEFAULT_SEVERITY;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Days shown in the severity trend.
    pub window_days: usize,
    pub top_n: usize,
    pub default_severity: i32,
    /// Records the tracker view loads for its statistics.
    pub tracker_history_limit: usize,
    pub recent_activity_limit: usize,
    pub store_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            top_n: 5,
            default_severity: DEFAULT_SEVERITY,
            tracker_history_limit: 30,
            recent_activity_limit: 5,
            store_timeout_secs: 5,
        }
    }
}

impl EngineConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}
