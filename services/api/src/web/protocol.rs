//! services/api/src/web/protocol.rs
//!
//! Defines the JSON message shapes exchanged between the browser client and the
//! API server, and their conversions to and from the core domain types.
//!
//! Vocabulary items travel as a flat camelCase record with ISO-8601 timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use vocabulary_core::{
    domain::{ScheduledRecord, StudyQueue, StudyStats, Translation, VocabularyRecord},
    ports::PortError,
    session::StudySession,
    vocabulary::{check_record, NewVocabularyItem, VocabularyEdit},
};

//=========================================================================================
// Vocabulary Records
//=========================================================================================

/// A saved vocabulary item in its persisted representation.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItemPayload {
    pub id: String,
    pub original: String,
    pub translation: String,
    #[serde(default)]
    pub context: String,
    /// Seconds into the source media.
    #[serde(default)]
    pub timestamp: f64,
    #[serde(default)]
    pub video_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl From<VocabularyRecord> for VocabularyItemPayload {
    fn from(record: VocabularyRecord) -> Self {
        Self {
            id: record.id,
            original: record.original,
            translation: record.translation,
            context: record.context,
            timestamp: record.timestamp,
            video_id: record.video_id,
            date_added: record.date_added,
            review_count: record.review_count,
            last_reviewed: record.last_reviewed,
        }
    }
}

impl VocabularyItemPayload {
    /// Converts an imported item, rejecting ones the engine cannot work with.
    pub fn into_domain(self) -> Result<VocabularyRecord, PortError> {
        let record = VocabularyRecord {
            id: self.id,
            original: self.original,
            translation: self.translation,
            context: self.context,
            timestamp: self.timestamp,
            video_id: self.video_id,
            date_added: self.date_added,
            review_count: self.review_count,
            last_reviewed: self.last_reviewed,
        };
        check_record(&record)?;
        Ok(record)
    }
}

/// Body of `POST /vocabulary`.
#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SaveVocabularyRequest {
    pub original: Option<String>,
    pub translation: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub video_id: Option<String>,
}

impl SaveVocabularyRequest {
    pub fn into_new_item(self) -> Result<NewVocabularyItem, PortError> {
        let item = NewVocabularyItem {
            original: self.original.unwrap_or_default(),
            translation: self.translation.unwrap_or_default(),
            context: self.context.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or_default(),
            video_id: self.video_id.unwrap_or_default(),
        };
        item.validate()?;
        Ok(item)
    }
}

/// Body of `PUT /vocabulary/{id}`. Omitted fields are left unchanged.
#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVocabularyRequest {
    pub translation: Option<String>,
    pub context: Option<String>,
    pub timestamp: Option<f64>,
    pub video_id: Option<String>,
}

impl From<UpdateVocabularyRequest> for VocabularyEdit {
    fn from(req: UpdateVocabularyRequest) -> Self {
        Self {
            translation: req.translation,
            context: req.context,
            timestamp: req.timestamp,
            video_id: req.video_id,
        }
    }
}

/// Query string of `GET /vocabulary`.
#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring of the original or the translation.
    pub search: Option<String>,
    /// One of `date-desc`, `date-asc`, `alpha-asc`, `alpha-desc`,
    /// `review-count-asc`, `review-count-desc`, `last-reviewed-asc`, `last-reviewed-desc`.
    pub sort: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ImportResponse {
    pub imported: usize,
}

//=========================================================================================
// Reviews and Study Queue
//=========================================================================================

/// Body of `POST /vocabulary/review`.
#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub id: Option<String>,
    /// Overrides the incremented count when present.
    pub review_count: Option<u32>,
    /// Defaults to the time the request is handled.
    pub last_reviewed: Option<DateTime<Utc>>,
}

/// A queued item with its due information.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StudyItemPayload {
    #[serde(flatten)]
    pub item: VocabularyItemPayload,
    pub due_date: Option<DateTime<Utc>>,
    pub is_due: bool,
}

impl From<ScheduledRecord> for StudyItemPayload {
    fn from(scheduled: ScheduledRecord) -> Self {
        Self {
            item: scheduled.record.into(),
            due_date: scheduled.due.due_date,
            is_due: scheduled.due.is_due,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudyStatsPayload {
    pub total_items: usize,
    pub due_items: usize,
    pub mastered_items: usize,
    pub studied_items: usize,
}

impl From<StudyStats> for StudyStatsPayload {
    fn from(stats: StudyStats) -> Self {
        Self {
            total_items: stats.total_items,
            due_items: stats.due_items,
            mastered_items: stats.mastered_items,
            studied_items: stats.studied_items,
        }
    }
}

/// Response of `GET /vocabulary/review`.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StudyQueueResponse {
    #[serde(flatten)]
    pub stats: StudyStatsPayload,
    pub study_items: Vec<StudyItemPayload>,
}

impl From<StudyQueue> for StudyQueueResponse {
    fn from(queue: StudyQueue) -> Self {
        Self {
            stats: queue.stats.into(),
            study_items: queue.study_items.into_iter().map(Into::into).collect(),
        }
    }
}

//=========================================================================================
// Study Sessions
//=========================================================================================

/// Where a study session stands.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StudySessionView {
    pub session_id: Uuid,
    pub position: usize,
    pub total: usize,
    pub remaining: usize,
    pub completed: bool,
    pub current: Option<StudyItemPayload>,
    pub stats: StudyStatsPayload,
}

impl StudySessionView {
    pub fn new(session_id: Uuid, session: &StudySession) -> Self {
        Self {
            session_id,
            position: session.position(),
            total: session.len(),
            remaining: session.remaining(),
            completed: session.is_complete(),
            current: session.current().cloned().map(Into::into),
            stats: session.stats().into(),
        }
    }
}

/// Body of `POST /study/sessions/{id}/responses`.
#[derive(Deserialize, ToSchema, Debug)]
pub struct RespondRequest {
    /// One of `again`, `hard`, `good`, `easy`.
    pub response: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct RespondResponse {
    pub updated: VocabularyItemPayload,
    pub session: StudySessionView,
}

//=========================================================================================
// Translation
//=========================================================================================

#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct TranslateQuery {
    /// Source-language text to translate.
    pub text: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct TranslationResponse {
    pub original: String,
    pub translation: String,
    pub alternatives: Vec<String>,
}

impl From<Translation> for TranslationResponse {
    fn from(t: Translation) -> Self {
        Self {
            original: t.original,
            translation: t.translation,
            alternatives: t.alternatives,
        }
    }
}
