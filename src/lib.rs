pub mod classifier;
pub mod vocabulary;
pub mod severity;
pub mod entry;
pub mod aggregate;
pub mod store;
pub mod config;
pub mod pipeline;
pub mod overview;

pub use aggregate::{
    compute_average_severity, compute_daily_trend, compute_top_symptoms, SymptomFrequency,
    TrendPoint,
};
pub use classifier::{classify, classify_message, ClassificationResult, ResponseCategory, RuleSet};
pub use entry::SymptomLogEntry;
pub use severity::parse_severity;
pub use store::{LogStore, StorageError};
pub use vocabulary::extract_symptoms;
