//! crates/vocabulary_core/src/vocabulary.rs
//!
//! Pure helpers over the vocabulary collection: saving a clicked word,
//! editing an entry, searching and list ordering.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::VocabularyRecord;
use crate::ports::PortError;
use crate::scheduler::apply_review;

/// A word the learner asked to save, as received from the outer layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewVocabularyItem {
    pub original: String,
    pub translation: String,
    pub context: String,
    pub timestamp: f64,
    pub video_id: String,
}

impl NewVocabularyItem {
    pub fn validate(&self) -> Result<(), PortError> {
        if self.original.trim().is_empty() || self.translation.trim().is_empty() {
            return Err(PortError::InvalidInput(
                "original and translation are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// What saving a word did to the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(VocabularyRecord),
    /// The word was already saved; it was refreshed and counted as reviewed.
    Refreshed(VocabularyRecord),
}

impl SaveOutcome {
    pub fn record(&self) -> &VocabularyRecord {
        match self {
            SaveOutcome::Created(record) | SaveOutcome::Refreshed(record) => record,
        }
    }

    pub fn into_record(self) -> VocabularyRecord {
        match self {
            SaveOutcome::Created(record) | SaveOutcome::Refreshed(record) => record,
        }
    }
}

/// Combines a newly saved word with the entry already stored for the same
/// original text, if any.
///
/// A fresh word gets `new_id` and starts unreviewed. Saving a known word again
/// replaces its translation, keeps old context fields unless new ones are
/// given, and counts as a review at `now`.
pub fn merge_saved_word(
    existing: Option<VocabularyRecord>,
    item: NewVocabularyItem,
    new_id: impl Into<String>,
    now: DateTime<Utc>,
) -> SaveOutcome {
    match existing {
        None => SaveOutcome::Created(VocabularyRecord {
            id: new_id.into(),
            original: item.original,
            translation: item.translation,
            context: item.context,
            timestamp: item.timestamp,
            video_id: item.video_id,
            date_added: Some(now),
            review_count: 0,
            last_reviewed: None,
        }),
        Some(existing) => {
            let mut refreshed = apply_review(&existing, now, None);
            refreshed.translation = item.translation;
            if !item.context.is_empty() {
                refreshed.context = item.context;
            }
            if item.timestamp != 0.0 {
                refreshed.timestamp = item.timestamp;
            }
            if !item.video_id.is_empty() {
                refreshed.video_id = item.video_id;
            }
            SaveOutcome::Refreshed(refreshed)
        }
    }
}

/// Editable fields of a saved entry. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VocabularyEdit {
    pub translation: Option<String>,
    pub context: Option<String>,
    pub timestamp: Option<f64>,
    pub video_id: Option<String>,
}

impl VocabularyEdit {
    /// Applies the edit. Scheduling fields are never touched.
    pub fn apply(self, record: &VocabularyRecord) -> Result<VocabularyRecord, PortError> {
        let mut edited = record.clone();
        if let Some(translation) = self.translation {
            if translation.trim().is_empty() {
                return Err(PortError::InvalidInput(
                    "translation cannot be empty".to_string(),
                ));
            }
            edited.translation = translation;
        }
        if let Some(context) = self.context {
            edited.context = context;
        }
        if let Some(timestamp) = self.timestamp {
            edited.timestamp = timestamp;
        }
        if let Some(video_id) = self.video_id {
            edited.video_id = video_id;
        }
        Ok(edited)
    }
}

/// Checks a record arriving from outside (imports, explicit reviews) before it
/// is stored.
///
/// A record has been reviewed exactly when its count is above zero, and it
/// cannot be reviewed before it was added.
pub fn check_record(record: &VocabularyRecord) -> Result<(), PortError> {
    if record.id.trim().is_empty() {
        return Err(PortError::InvalidInput("item without id".to_string()));
    }
    if record.original.trim().is_empty() || record.translation.trim().is_empty() {
        return Err(PortError::InvalidInput(format!(
            "item {} is missing original or translation",
            record.id
        )));
    }
    match (record.review_count, record.last_reviewed) {
        (0, Some(_)) => {
            return Err(PortError::InvalidInput(format!(
                "item {} has a review date but a review count of 0",
                record.id
            )))
        }
        (count, None) if count > 0 => {
            return Err(PortError::InvalidInput(format!(
                "item {} has {} reviews but no review date",
                record.id, count
            )))
        }
        _ => {}
    }
    if let (Some(added), Some(reviewed)) = (record.date_added, record.last_reviewed) {
        if reviewed < added {
            return Err(PortError::InvalidInput(format!(
                "item {} was reviewed before it was added",
                record.id
            )));
        }
    }
    Ok(())
}

/// Keeps records whose original or translation contains `term`, ignoring case.
pub fn filter_records(records: Vec<VocabularyRecord>, term: &str) -> Vec<VocabularyRecord> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| {
            r.original.to_lowercase().contains(&term)
                || r.translation.to_lowercase().contains(&term)
        })
        .collect()
}

/// Display orders for the vocabulary list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VocabularySort {
    #[default]
    DateDesc,
    DateAsc,
    AlphaAsc,
    AlphaDesc,
    ReviewCountAsc,
    ReviewCountDesc,
    LastReviewedAsc,
    LastReviewedDesc,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort option: {0}")]
pub struct UnknownSort(pub String);

impl FromStr for VocabularySort {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(Self::DateDesc),
            "date-asc" => Ok(Self::DateAsc),
            "alpha-asc" => Ok(Self::AlphaAsc),
            "alpha-desc" => Ok(Self::AlphaDesc),
            "review-count-asc" => Ok(Self::ReviewCountAsc),
            "review-count-desc" => Ok(Self::ReviewCountDesc),
            "last-reviewed-asc" => Ok(Self::LastReviewedAsc),
            "last-reviewed-desc" => Ok(Self::LastReviewedDesc),
            other => Err(UnknownSort(other.to_string())),
        }
    }
}

/// Never-reviewed entries go last whichever direction is asked for.
fn cmp_last_reviewed(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
    descending: bool,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of `records` in the requested display order.
pub fn sort_records(records: &mut [VocabularyRecord], sort: VocabularySort) {
    match sort {
        VocabularySort::DateDesc => records.sort_by(|a, b| b.date_added.cmp(&a.date_added)),
        VocabularySort::DateAsc => records.sort_by(|a, b| a.date_added.cmp(&b.date_added)),
        VocabularySort::AlphaAsc => records.sort_by(|a, b| a.original.cmp(&b.original)),
        VocabularySort::AlphaDesc => records.sort_by(|a, b| b.original.cmp(&a.original)),
        VocabularySort::ReviewCountAsc => records.sort_by_key(|r| r.review_count),
        VocabularySort::ReviewCountDesc => {
            records.sort_by(|a, b| b.review_count.cmp(&a.review_count))
        }
        VocabularySort::LastReviewedAsc => {
            records.sort_by(|a, b| cmp_last_reviewed(a.last_reviewed, b.last_reviewed, false))
        }
        VocabularySort::LastReviewedDesc => {
            records.sort_by(|a, b| cmp_last_reviewed(a.last_reviewed, b.last_reviewed, true))
        }
    }
}
