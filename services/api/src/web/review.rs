//! services/api/src/web/review.rs
//!
//! Handlers for today's study queue and for recording single reviews.

use crate::web::{
    port_failure,
    protocol::{ReviewRequest, StudyQueueResponse, VocabularyItemPayload},
    state::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use vocabulary_core::{
    scheduler::{apply_review, build_study_queue},
    vocabulary::check_record,
};

/// Build today's study queue from the whole collection.
#[utoipa::path(
    get,
    path = "/vocabulary/review",
    responses(
        (status = 200, description = "Collection stats and the capped, ordered study items", body = StudyQueueResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn study_queue_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let records = app_state
        .store
        .list_all()
        .await
        .map_err(|e| port_failure("build study queue", e))?;

    let queue = build_study_queue(&records, Utc::now());
    info!(
        "Built study queue: {} of {} items due, {} queued",
        queue.stats.due_items,
        queue.stats.total_items,
        queue.study_items.len()
    );
    Ok(Json(StudyQueueResponse::from(queue)))
}

/// Record that an item was reviewed.
#[utoipa::path(
    post,
    path = "/vocabulary/review",
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "The reviewed item", body = VocabularyItemPayload),
        (status = 400, description = "Missing item id, a review count of 0, or a review date before the item was added"),
        (status = 404, description = "No item with this id")
    )
)]
pub async fn review_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<ReviewRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let id = req
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Missing item id".to_string()))?;

    let store = &app_state.store;
    let record = store
        .get(&id)
        .await
        .map_err(|e| port_failure("record review", e))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Vocabulary item {} not found", id)))?;

    let reviewed_at = req.last_reviewed.unwrap_or_else(Utc::now);
    let reviewed = apply_review(&record, reviewed_at, req.review_count);
    check_record(&reviewed).map_err(|e| port_failure("record review", e))?;

    let updated = store
        .put(reviewed)
        .await
        .map_err(|e| port_failure("record review", e))?;

    info!(
        "Reviewed item {}, review count now {}",
        updated.id, updated.review_count
    );
    Ok(Json(VocabularyItemPayload::from(updated)))
}
