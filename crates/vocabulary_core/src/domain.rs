//! crates/vocabulary_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// One saved vocabulary entry: source text, its translation and the
/// scheduling metadata the engine reads.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyRecord {
    pub id: String,
    pub original: String,
    pub translation: String,
    /// Supporting text such as the subtitle line the word was found in. May be empty.
    pub context: String,
    /// Seconds into the source media. Zero when unknown.
    pub timestamp: f64,
    /// May be empty.
    pub video_id: String,
    /// Absent only for malformed imports; such records sort last on date ties.
    pub date_added: Option<DateTime<Utc>>,
    pub review_count: u32,
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl VocabularyRecord {
    /// A never-reviewed record added at `date_added`.
    pub fn new(
        id: impl Into<String>,
        original: impl Into<String>,
        translation: impl Into<String>,
        date_added: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            original: original.into(),
            translation: translation.into(),
            context: String::new(),
            timestamp: 0.0,
            video_id: String::new(),
            date_added: Some(date_added),
            review_count: 0,
            last_reviewed: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.review_count == 0
    }
}

/// Due-date information for one record at a reference instant. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueInfo {
    /// `None` for never-reviewed records.
    pub due_date: Option<DateTime<Utc>>,
    pub is_due: bool,
}

/// A record together with its due information, as placed in a study queue.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledRecord {
    pub record: VocabularyRecord,
    pub due: DueInfo,
}

/// Aggregate counts over a whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudyStats {
    pub total_items: usize,
    pub due_items: usize,
    pub mastered_items: usize,
    /// Records reviewed at least once.
    pub studied_items: usize,
}

/// The ordered, capped selection of records for one study session plus the
/// statistics of the collection it was drawn from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudyQueue {
    pub stats: StudyStats,
    pub study_items: Vec<ScheduledRecord>,
}

/// Scheduling state of a record, derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// Never reviewed.
    New,
    Due,
    Scheduled,
}

/// The learner's self-assessment after seeing an answer.
///
/// It is recorded for feedback only; every response advances the interval
/// ladder by the same single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewResponse {
    Again,
    Hard,
    Good,
    Easy,
}

impl ReviewResponse {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewResponse::Again => "again",
            ReviewResponse::Hard => "hard",
            ReviewResponse::Good => "good",
            ReviewResponse::Easy => "easy",
        }
    }
}

impl fmt::Display for ReviewResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown review response: {0}")]
pub struct UnknownResponse(pub String);

impl FromStr for ReviewResponse {
    type Err = UnknownResponse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" => Ok(ReviewResponse::Again),
            "hard" => Ok(ReviewResponse::Hard),
            "good" => Ok(ReviewResponse::Good),
            "easy" => Ok(ReviewResponse::Easy),
            _ => Err(UnknownResponse(s.to_string())),
        }
    }
}

/// Result of a translator lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub original: String,
    pub translation: String,
    pub alternatives: Vec<String>,
}
