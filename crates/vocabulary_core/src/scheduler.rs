//! crates/vocabulary_core/src/scheduler.rs
//!
//! The scheduling engine: pure functions that decide which vocabulary records
//! are due, in what order they are studied, how a review moves a record along
//! the interval ladder, and what the collection looks like in aggregate.
//!
//! Nothing here reads a clock or a store. Callers pass the records and `now`.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    DueInfo, RecordState, ScheduledRecord, StudyQueue, StudyStats, VocabularyRecord,
};

/// Review intervals in days, indexed by `min(review_count, len - 1)`.
pub const INTERVAL_LADDER_DAYS: [i64; 7] = [1, 3, 7, 14, 30, 90, 180];

/// Review count at which a record counts as mastered.
pub const MASTERED_REVIEW_COUNT: u32 = 5;

/// Bounds of the self-scaling daily session size.
pub const MIN_DAILY_LIMIT: usize = 5;
pub const MAX_DAILY_LIMIT: usize = 20;

/// One in this many records is studied per session, before clamping.
const DAILY_LIMIT_DIVISOR: usize = 5;

/// The ladder interval used after `review_count` reviews. The last rung repeats.
pub fn interval_days(review_count: u32) -> i64 {
    let index = (review_count as usize).min(INTERVAL_LADDER_DAYS.len() - 1);
    INTERVAL_LADDER_DAYS[index]
}

/// Computes when `record` is next due and whether that instant has passed.
///
/// Never-reviewed records have no due date and are always due. A due date
/// past the last representable instant is treated as never arriving.
pub fn compute_due_info(record: &VocabularyRecord, now: DateTime<Utc>) -> DueInfo {
    let Some(last_reviewed) = record.last_reviewed else {
        return DueInfo {
            due_date: None,
            is_due: true,
        };
    };

    match last_reviewed.checked_add_signed(Duration::days(interval_days(record.review_count))) {
        Some(due_date) => DueInfo {
            due_date: Some(due_date),
            is_due: due_date <= now,
        },
        None => DueInfo {
            due_date: None,
            is_due: false,
        },
    }
}

/// Classifies a record as new, due or scheduled at `now`.
pub fn record_state(record: &VocabularyRecord, now: DateTime<Utc>) -> RecordState {
    if record.is_new() {
        return RecordState::New;
    }
    if compute_due_info(record, now).is_due {
        RecordState::Due
    } else {
        RecordState::Scheduled
    }
}

/// Study order comparator.
///
/// Each criterion only applies when every previous one ties:
/// 1. due before not due
/// 2. never reviewed before reviewed
/// 3. earlier due date first, when both have one
/// 4. earlier `date_added` first, records without one last
/// 5. id, so the order is total
pub fn rank_for_study(a: &ScheduledRecord, b: &ScheduledRecord) -> Ordering {
    b.due
        .is_due
        .cmp(&a.due.is_due)
        .then_with(|| b.record.is_new().cmp(&a.record.is_new()))
        .then_with(|| match (a.due.due_date, b.due.due_date) {
            (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
            _ => Ordering::Equal,
        })
        .then_with(|| match (a.record.date_added, b.record.date_added) {
            (Some(a_added), Some(b_added)) => a_added.cmp(&b_added),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.record.id.cmp(&b.record.id))
}

/// Session size for a collection of `total` records:
/// `clamp(ceil(total / 5), 5, 20)`, never more than `total`.
pub fn daily_limit(total: usize) -> usize {
    total
        .div_ceil(DAILY_LIMIT_DIVISOR)
        .clamp(MIN_DAILY_LIMIT, MAX_DAILY_LIMIT)
        .min(total)
}

/// Aggregate counts over the whole collection at `now`.
pub fn compute_stats(records: &[VocabularyRecord], now: DateTime<Utc>) -> StudyStats {
    records.iter().fold(
        StudyStats {
            total_items: records.len(),
            ..StudyStats::default()
        },
        |mut stats, record| {
            if compute_due_info(record, now).is_due {
                stats.due_items += 1;
            }
            if record.review_count >= MASTERED_REVIEW_COUNT {
                stats.mastered_items += 1;
            }
            if !record.is_new() {
                stats.studied_items += 1;
            }
            stats
        },
    )
}

/// Builds the study queue for `now`: every record ranked by [`rank_for_study`],
/// truncated to [`daily_limit`]. Counts cover the full input, not the queue.
pub fn build_study_queue(records: &[VocabularyRecord], now: DateTime<Utc>) -> StudyQueue {
    let mut ranked: Vec<ScheduledRecord> = records
        .iter()
        .map(|record| ScheduledRecord {
            due: compute_due_info(record, now),
            record: record.clone(),
        })
        .collect();
    ranked.sort_by(rank_for_study);
    ranked.truncate(daily_limit(ranked.len()));

    StudyQueue {
        stats: compute_stats(records, now),
        study_items: ranked,
    }
}

/// Returns a copy of `record` after a review at `now`.
///
/// `review_count` becomes `explicit_review_count` when given, otherwise it
/// goes up by exactly one. Every other field is unchanged.
pub fn apply_review(
    record: &VocabularyRecord,
    now: DateTime<Utc>,
    explicit_review_count: Option<u32>,
) -> VocabularyRecord {
    VocabularyRecord {
        review_count: explicit_review_count
            .unwrap_or_else(|| record.review_count.saturating_add(1)),
        last_reviewed: Some(now),
        ..record.clone()
    }
}
