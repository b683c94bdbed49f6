use crate::classifier::{ClassificationResult, ResponseCategory, RuleSet};
use crate::config::EngineConfig;
use crate::entry::{EntryError, SymptomLogEntry};
use crate::store::{LogStore, RecentQuery, StorageError};
use crate::{severity, vocabulary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Entry(#[from] EntryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result of one chat message. The response is final as soon as the turn
/// exists; `persistence` resolves independently.
#[derive(Debug)]
pub struct ChatTurn {
    pub classification: ClassificationResult,
    pub symptoms: Vec<String>,
    pub severity: Option<i32>,
    pub entry: Option<SymptomLogEntry>,
    pub persistence: Option<JoinHandle<Result<(), StorageError>>>,
}

/// Serializable view of a `ChatTurn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response_text: String,
    pub matched_category: Option<ResponseCategory>,
    pub symptoms: Vec<String>,
    pub severity: Option<i32>,
    pub logged: bool,
}

impl ChatTurn {
    pub fn reply(&self) -> ChatReply {
        ChatReply {
            response_text: self.classification.response_text.clone(),
            matched_category: self.classification.matched_category,
            symptoms: self.symptoms.clone(),
            severity: self.severity,
            logged: self.entry.is_some(),
        }
    }

    /// Waits for the background append, if one was started.
    pub async fn persisted(self) -> Result<(), StorageError> {
        match self.persistence {
            None => Ok(()),
            Some(handle) => handle
                .await
                .map_err(|e| StorageError::Unavailable(format!("append task failed: {e}")))?,
        }
    }
}

pub struct SymptomTracker<S: LogStore> {
    store: Arc<S>,
    rules: RuleSet,
    config: EngineConfig,
}

impl<S: LogStore> SymptomTracker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store, rules: RuleSet::standard(), config: EngineConfig::default() }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn handle_message(&self, user_id: &str, message: &str) -> Option<ChatTurn> {
        self.handle_message_at(user_id, message, Utc::now())
    }

    /// Classifies `message` and, when it names symptoms, starts a background
    /// append. Whitespace-only messages are ignored. Must be called from
    /// within a Tokio runtime.
    pub fn handle_message_at(
        &self,
        user_id: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> Option<ChatTurn> {
        if message.trim().is_empty() {
            return None;
        }
        let classification = self.rules.classify(message);
        let symptoms = vocabulary::extract_symptoms(message);
        let severity = severity::parse_severity(message);
        // A parsed 0 counts as no score for the stored entry.
        let stored_severity = severity.filter(|&s| s != 0).unwrap_or(self.config.default_severity);

        let entry = SymptomLogEntry::from_chat(
            user_id,
            message,
            symptoms.clone(),
            stored_severity,
            &classification.response_text,
            now,
        );
        let persistence = entry.clone().map(|e| self.spawn_append(e));

        Some(ChatTurn { classification, symptoms, severity, entry, persistence })
    }

    fn spawn_append(&self, entry: SymptomLogEntry) -> JoinHandle<Result<(), StorageError>> {
        let store = Arc::clone(&self.store);
        let timeout = self.config.store_timeout();
        tokio::spawn(async move {
            let id = entry.id;
            let res = append_with_timeout(&*store, entry, timeout).await;
            match &res {
                Ok(()) => tracing::info!(%id, "symptom log persisted"),
                Err(err) => tracing::warn!(%id, %err, "symptom log not persisted"),
            }
            res
        })
    }

    /// Manual tracking form. The append is awaited so the caller can report
    /// the outcome.
    pub async fn record_manual(
        &self,
        user_id: &str,
        symptoms: Vec<String>,
        severity: i32,
        notes: Option<&str>,
    ) -> Result<SymptomLogEntry, TrackerError> {
        self.record_manual_at(user_id, symptoms, severity, notes, Utc::now()).await
    }

    pub async fn record_manual_at(
        &self,
        user_id: &str,
        symptoms: Vec<String>,
        severity: i32,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SymptomLogEntry, TrackerError> {
        let entry = SymptomLogEntry::manual(user_id, symptoms, severity, notes, now)?;
        append_with_timeout(&*self.store, entry.clone(), self.config.store_timeout()).await?;
        tracing::info!(id = %entry.id, "manual symptom log saved");
        Ok(entry)
    }

    /// Records the tracker statistics are computed over, newest first.
    pub async fn history(&self, user_id: &str) -> Result<Vec<SymptomLogEntry>, StorageError> {
        self.store
            .query_recent(user_id, &RecentQuery::latest(self.config.tracker_history_limit))
            .await
    }
}

pub async fn append_with_timeout<S: LogStore + ?Sized>(
    store: &S,
    entry: SymptomLogEntry,
    timeout: Duration,
) -> Result<(), StorageError> {
    match tokio::time::timeout(timeout, store.append(entry)).await {
        Ok(res) => res,
        Err(_) => Err(StorageError::Timeout { secs: timeout.as_secs() }),
    }
}
