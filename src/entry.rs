use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("at least one symptom must be selected")]
    NoSymptoms,
    #[error("symptom at position {index} is blank")]
    BlankSymptom { index: usize },
}

/// One stored observation. Entries are never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomLogEntry {
    pub id: Uuid,
    pub user_id: String,
    pub symptoms: Vec<String>,
    pub severity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_response: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SymptomLogEntry {
    /// Entry produced by the chat path. Returns `None` when nothing was
    /// extracted, since symptom-less chat messages are never stored.
    pub fn from_chat(
        user_id: &str,
        message: &str,
        symptoms: Vec<String>,
        severity: i32,
        ai_response: &str,
        created_at: DateTime<Utc>,
    ) -> Option<Self> {
        if symptoms.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            symptoms,
            severity,
            notes: Some(message.to_string()),
            ai_response: Some(ai_response.to_string()),
            created_at,
        })
    }

    /// Entry produced by the manual tracking form.
    pub fn manual(
        user_id: &str,
        symptoms: Vec<String>,
        severity: i32,
        notes: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EntryError> {
        validate_symptoms(&symptoms)?;
        let notes = notes.filter(|n| !n.trim().is_empty()).map(str::to_string);
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            symptoms,
            severity,
            notes,
            ai_response: None,
            created_at,
        })
    }

    pub fn validate(&self) -> Result<(), EntryError> {
        validate_symptoms(&self.symptoms)
    }
}

fn validate_symptoms(symptoms: &[String]) -> Result<(), EntryError> {
    if symptoms.is_empty() {
        return Err(EntryError::NoSymptoms);
    }
    match symptoms.iter().position(|s| s.trim().is_empty()) {
        Some(index) => Err(EntryError::BlankSymptom { index }),
        None => Ok(()),
    }
}
