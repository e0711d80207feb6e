//! services/api/src/web/study.rs
//!
//! Handlers that walk a learner through today's queue one item at a time.

use crate::web::{
    port_failure,
    protocol::{RespondRequest, RespondResponse, StudySessionView, VocabularyItemPayload},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;
use vocabulary_core::{
    domain::ReviewResponse,
    scheduler::{apply_review, build_study_queue},
    session::StudySession,
};

fn unknown_session(id: Uuid) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("Study session {} not found", id))
}

async fn find_session(
    app_state: &AppState,
    session_id: Uuid,
) -> Result<Arc<Mutex<StudySession>>, (StatusCode, String)> {
    app_state
        .session(session_id)
        .await
        .ok_or_else(|| unknown_session(session_id))
}

/// Open a session over today's study queue.
#[utoipa::path(
    post,
    path = "/study/sessions",
    responses(
        (status = 201, description = "Session created", body = StudySessionView),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn start_session_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let records = app_state
        .store
        .list_all()
        .await
        .map_err(|e| port_failure("start study session", e))?;

    let session = StudySession::new(build_study_queue(&records, Utc::now()));
    let session_id = Uuid::new_v4();
    let view = StudySessionView::new(session_id, &session);

    app_state.insert_session(session_id, session).await;
    info!("Started study session {} with {} items", session_id, view.total);
    Ok((StatusCode::CREATED, Json(view)))
}

/// Show where a session stands.
#[utoipa::path(
    get,
    path = "/study/sessions/{id}",
    params(("id" = Uuid, Path, description = "Study session id")),
    responses(
        (status = 200, description = "Session state", body = StudySessionView),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let handle = find_session(&app_state, session_id).await?;
    let session = handle.lock().await;
    Ok(Json(StudySessionView::new(session_id, &session)))
}

/// Answer the current item.
///
/// The review is applied to the stored record, not the session's copy, and
/// persisted before the session advances. A record deleted since the session
/// started is dropped from the session and reported as not found.
#[utoipa::path(
    post,
    path = "/study/sessions/{id}/responses",
    params(("id" = Uuid, Path, description = "Study session id")),
    request_body = RespondRequest,
    responses(
        (status = 200, description = "Reviewed item and the next session state", body = RespondResponse),
        (status = 400, description = "Unknown response value"),
        (status = 404, description = "Unknown session, or the current item was deleted"),
        (status = 409, description = "Session already complete")
    )
)]
pub async fn respond_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let response = req
        .response
        .parse::<ReviewResponse>()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let handle = find_session(&app_state, session_id).await?;
    let mut session = handle.lock().await;

    let record_id = match session.current() {
        Some(current) => current.record.id.clone(),
        None => {
            return Err((
                StatusCode::CONFLICT,
                format!("Study session {} is already complete", session_id),
            ))
        }
    };

    let store = &app_state.store;
    let Some(stored) = store
        .get(&record_id)
        .await
        .map_err(|e| port_failure("record study response", e))?
    else {
        session.drop_current();
        warn!(
            "Session {}: item {} was deleted, dropped from the queue",
            session_id, record_id
        );
        return Err((
            StatusCode::NOT_FOUND,
            format!("Vocabulary item {} no longer exists", record_id),
        ));
    };

    let now = Utc::now();
    let updated = store
        .put(apply_review(&stored, now, None))
        .await
        .map_err(|e| port_failure("record study response", e))?;
    session.accept_review(response, updated.clone(), now);

    info!(
        "Session {}: answered '{}' for item {} ({}/{})",
        session_id,
        response,
        updated.id,
        session.position(),
        session.len()
    );
    Ok(Json(RespondResponse {
        updated: VocabularyItemPayload::from(updated),
        session: StudySessionView::new(session_id, &session),
    }))
}

/// Go back to the first item of the same queue.
#[utoipa::path(
    post,
    path = "/study/sessions/{id}/restart",
    params(("id" = Uuid, Path, description = "Study session id")),
    responses(
        (status = 200, description = "Session state after restarting", body = StudySessionView),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn restart_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let handle = find_session(&app_state, session_id).await?;
    let mut session = handle.lock().await;
    session.restart();
    Ok(Json(StudySessionView::new(session_id, &session)))
}
