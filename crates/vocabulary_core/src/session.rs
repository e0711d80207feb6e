//! crates/vocabulary_core/src/session.rs
//!
//! A study session: today's queue plus the learner's position in it.

use chrono::{DateTime, Utc};

use crate::domain::{ReviewResponse, ScheduledRecord, StudyQueue, StudyStats, VocabularyRecord};
use crate::scheduler::{apply_review, compute_due_info};

/// Walks a [`StudyQueue`] one record at a time.
///
/// The session owns copies of the queued records. Persisting the records it
/// hands back from [`StudySession::record_response`] is the caller's job.
#[derive(Debug, Clone)]
pub struct StudySession {
    items: Vec<ScheduledRecord>,
    stats: StudyStats,
    position: usize,
    responses: Vec<ReviewResponse>,
}

impl StudySession {
    pub fn new(queue: StudyQueue) -> Self {
        Self {
            items: queue.study_items,
            stats: queue.stats,
            position: 0,
            responses: Vec::new(),
        }
    }

    /// The record awaiting a response, or `None` once every item was answered.
    pub fn current(&self) -> Option<&ScheduledRecord> {
        self.items.get(self.position)
    }

    /// Reviews the current record at `now` and moves to the next one.
    ///
    /// Returns the updated record, or `None` when the session is complete.
    pub fn record_response(
        &mut self,
        response: ReviewResponse,
        now: DateTime<Utc>,
    ) -> Option<VocabularyRecord> {
        let updated = apply_review(&self.current()?.record, now, None);
        self.accept_review(response, updated.clone(), now);
        Some(updated)
    }

    /// Replaces the current record with `reviewed`, the copy the caller
    /// reviewed and persisted, and moves to the next one.
    ///
    /// Returns `false` without changes when the session is complete.
    pub fn accept_review(
        &mut self,
        response: ReviewResponse,
        reviewed: VocabularyRecord,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(item) = self.items.get_mut(self.position) else {
            return false;
        };
        item.due = compute_due_info(&reviewed, now);
        item.record = reviewed;
        self.responses.push(response);
        self.position += 1;
        true
    }

    /// Removes the current record from the queue, for records deleted from
    /// the collection mid-session. The next record becomes current.
    pub fn drop_current(&mut self) -> Option<ScheduledRecord> {
        if self.is_complete() {
            return None;
        }
        Some(self.items.remove(self.position))
    }

    /// Starts the same queue over from the first item.
    pub fn restart(&mut self) {
        self.position = 0;
        self.responses.clear();
    }

    pub fn is_complete(&self) -> bool {
        self.position >= self.items.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.items.len().saturating_sub(self.position)
    }

    /// Collection statistics captured when the queue was built.
    pub fn stats(&self) -> StudyStats {
        self.stats
    }

    /// Responses given since the session started or was last restarted.
    pub fn responses(&self) -> &[ReviewResponse] {
        &self.responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::build_study_queue;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 18, 30, 0).unwrap()
    }

    fn session_of(n: usize) -> StudySession {
        let records: Vec<_> = (0..n)
            .map(|i| {
                let added = now() - Duration::days(i as i64);
                VocabularyRecord::new(i.to_string(), "σπίτι", "house", added)
            })
            .collect();
        StudySession::new(build_study_queue(&records, now()))
    }

    #[test]
    fn walks_queue_in_order() {
        let mut session = session_of(3);
        assert_eq!(session.len(), 3);
        // Oldest added first.
        assert_eq!(session.current().map(|s| s.record.id.as_str()), Some("2"));

        let updated = session.record_response(ReviewResponse::Good, now()).unwrap();
        assert_eq!(updated.id, "2");
        assert_eq!(updated.review_count, 1);
        assert_eq!(updated.last_reviewed, Some(now()));
        assert_eq!(session.position(), 1);
        assert_eq!(session.remaining(), 2);
        assert_eq!(session.current().map(|s| s.record.id.as_str()), Some("1"));
    }

    #[test]
    fn response_quality_does_not_change_schedule() {
        let mut session = session_of(2);
        let again = session.record_response(ReviewResponse::Again, now()).unwrap();
        let easy = session.record_response(ReviewResponse::Easy, now()).unwrap();
        assert_eq!(again.review_count, easy.review_count);
        assert_eq!(session.responses(), &[ReviewResponse::Again, ReviewResponse::Easy]);
    }

    #[test]
    fn completes_and_stops_reviewing() {
        let mut session = session_of(1);
        assert!(session.record_response(ReviewResponse::Hard, now()).is_some());
        assert!(session.is_complete());
        assert!(session.current().is_none());
        assert!(session.record_response(ReviewResponse::Good, now()).is_none());
    }

    #[test]
    fn restart_revisits_updated_copies() {
        let mut session = session_of(1);
        session.record_response(ReviewResponse::Good, now());
        session.restart();
        assert!(!session.is_complete());
        let current = session.current().unwrap();
        assert_eq!(current.record.review_count, 1);
        assert!(!current.due.is_due);

        let again = session.record_response(ReviewResponse::Good, now()).unwrap();
        assert_eq!(again.review_count, 2);
    }

    #[test]
    fn accepted_review_replaces_queued_copy() {
        let mut session = session_of(2);
        let mut stored = session.current().unwrap().record.clone();
        stored.translation = "home".to_string();
        stored.review_count = 3;
        let reviewed = apply_review(&stored, now(), None);

        assert!(session.accept_review(ReviewResponse::Good, reviewed, now()));
        session.restart();
        let current = session.current().unwrap();
        assert_eq!(current.record.translation, "home");
        assert_eq!(current.record.review_count, 4);
        assert!(!current.due.is_due);
    }

    #[test]
    fn dropping_current_moves_to_next_record() {
        let mut session = session_of(3);
        let dropped = session.drop_current().unwrap();
        assert_eq!(dropped.record.id, "2");
        assert_eq!(session.len(), 2);
        assert_eq!(session.position(), 0);
        assert_eq!(session.current().map(|s| s.record.id.as_str()), Some("1"));

        session.record_response(ReviewResponse::Good, now());
        session.record_response(ReviewResponse::Good, now());
        assert!(session.drop_current().is_none());
        assert!(!session.accept_review(ReviewResponse::Easy, dropped.record, now()));
    }

    #[test]
    fn empty_queue_is_complete_immediately() {
        let session = StudySession::new(StudyQueue::default());
        assert!(session.is_empty());
        assert!(session.is_complete());
        assert_eq!(session.stats(), StudyStats::default());
    }
}
