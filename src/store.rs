use crate::entry::SymptomLogEntry;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage call timed out after {secs}s")]
    Timeout { secs: u64 },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Filter for `LogStore::query_recent`. The time range is half-open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentQuery {
    pub limit: Option<usize>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub order: Order,
}

impl RecentQuery {
    pub fn latest(limit: usize) -> Self {
        Self { limit: Some(limit), ..Default::default() }
    }

    pub fn between(since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        Self { since: Some(since), until: Some(until), ..Default::default() }
    }

    pub fn oldest_first(mut self) -> Self {
        self.order = Order::OldestFirst;
        self
    }

    fn admits(&self, entry: &SymptomLogEntry) -> bool {
        self.since.map(|s| entry.created_at >= s).unwrap_or(true)
            && self.until.map(|u| entry.created_at < u).unwrap_or(true)
    }
}

/// Append-only persistence for symptom log entries.
#[async_trait]
pub trait LogStore: Send + Sync + 'static {
    async fn append(&self, entry: SymptomLogEntry) -> Result<(), StorageError>;

    /// Entries of `user_id`, newest first unless the query asks otherwise.
    async fn query_recent(
        &self,
        user_id: &str,
        query: &RecentQuery,
    ) -> Result<Vec<SymptomLogEntry>, StorageError>;

    async fn count(&self, user_id: &str) -> Result<usize, StorageError>;
}

fn select<'a, I>(entries: I, user_id: &str, query: &RecentQuery) -> Vec<SymptomLogEntry>
where
    I: IntoIterator<Item = &'a SymptomLogEntry>,
{
    let mut out: Vec<SymptomLogEntry> = entries
        .into_iter()
        .filter(|e| e.user_id == user_id && query.admits(e))
        .cloned()
        .collect();
    // Stable: equal timestamps keep append order, so reversing puts the later append first.
    out.sort_by_key(|e| e.created_at);
    if query.order == Order::NewestFirst {
        out.reverse();
    }
    if let Some(limit) = query.limit {
        out.truncate(limit);
    }
    out
}

#[derive(Default)]
pub struct MemoryLogStore {
    entries: RwLock<Vec<SymptomLogEntry>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self { entries: RwLock::new(Vec::new()) }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn append(&self, entry: SymptomLogEntry) -> Result<(), StorageError> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn query_recent(
        &self,
        user_id: &str,
        query: &RecentQuery,
    ) -> Result<Vec<SymptomLogEntry>, StorageError> {
        let entries = self.entries.read().await;
        Ok(select(entries.iter(), user_id, query))
    }

    async fn count(&self, user_id: &str) -> Result<usize, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().filter(|e| e.user_id == user_id).count())
    }
}

/// Entries stored one JSON object per line. A missing file reads as empty;
/// malformed lines are skipped with a warning.
pub struct JsonlLogStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<SymptomLogEntry>, StorageError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };
        let mut out = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SymptomLogEntry>(line) {
                Ok(e) => out.push(e),
                Err(err) => {
                    tracing::warn!(
                        line = idx + 1,
                        path = %self.path.display(),
                        %err,
                        "skipping malformed log line"
                    );
                }
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl LogStore for JsonlLogStore {
    async fn append(&self, entry: SymptomLogEntry) -> Result<(), StorageError> {
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        let _guard = self.write_lock.lock().await;
        let mut f = tokio::fs::OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        // Start on a fresh line if an earlier write left the tail unterminated
        if f.metadata().await?.len() > 0 {
            f.seek(SeekFrom::End(-1)).await?;
            let mut last = [0u8; 1];
            f.read_exact(&mut last).await?;
            if last[0] != b'\n' {
                line.insert(0, '\n');
            }
        }
        f.write_all(line.as_bytes()).await?;
        f.flush().await?;
        Ok(())
    }

    async fn query_recent(
        &self,
        user_id: &str,
        query: &RecentQuery,
    ) -> Result<Vec<SymptomLogEntry>, StorageError> {
        let entries = self.read_all().await?;
        Ok(select(entries.iter(), user_id, query))
    }

    async fn count(&self, user_id: &str) -> Result<usize, StorageError> {
        let entries = self.read_all().await?;
        Ok(entries.iter().filter(|e| e.user_id == user_id).count())
    }
}
