//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the vocabulary collection endpoints and the
//! master definition for the OpenAPI document.

use crate::web::{
    port_failure,
    protocol::{
        ImportResponse, ListQuery, RespondRequest, RespondResponse, ReviewRequest,
        SaveVocabularyRequest, StudyItemPayload, StudyQueueResponse, StudySessionView,
        StudyStatsPayload, TranslationResponse, UpdateVocabularyRequest, VocabularyItemPayload,
    },
    review, state::AppState, study, translate,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use uuid::Uuid;
use vocabulary_core::{
    ports::PortError,
    vocabulary::{
        filter_records, merge_saved_word, sort_records, SaveOutcome, VocabularyEdit,
        VocabularySort,
    },
};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_vocabulary_handler,
        save_vocabulary_handler,
        get_vocabulary_handler,
        update_vocabulary_handler,
        delete_vocabulary_handler,
        export_vocabulary_handler,
        import_vocabulary_handler,
        review::study_queue_handler,
        review::review_handler,
        study::start_session_handler,
        study::get_session_handler,
        study::respond_handler,
        study::restart_session_handler,
        translate::translate_handler,
    ),
    components(
        schemas(
            VocabularyItemPayload,
            SaveVocabularyRequest,
            UpdateVocabularyRequest,
            ImportResponse,
            ReviewRequest,
            StudyItemPayload,
            StudyStatsPayload,
            StudyQueueResponse,
            StudySessionView,
            RespondRequest,
            RespondResponse,
            TranslationResponse,
        )
    ),
    tags(
        (name = "Vocabulary Trainer API", description = "Saved vocabulary, spaced-repetition study queue and translation.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List saved vocabulary, optionally filtered and sorted.
#[utoipa::path(
    get,
    path = "/vocabulary",
    params(ListQuery),
    responses(
        (status = 200, description = "Matching vocabulary items", body = [VocabularyItemPayload]),
        (status = 400, description = "Unknown sort option"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_vocabulary_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let sort = match query.sort.as_deref() {
        Some(name) => name
            .parse::<VocabularySort>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        None => VocabularySort::default(),
    };

    let records = app_state
        .store
        .list_all()
        .await
        .map_err(|e| port_failure("list vocabulary", e))?;

    let mut records = filter_records(records, query.search.as_deref().unwrap_or(""));
    sort_records(&mut records, sort);

    let items: Vec<VocabularyItemPayload> = records.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

/// Save a clicked word.
///
/// A word whose original text is already saved (ignoring case) is refreshed
/// with the new translation and counted as reviewed.
#[utoipa::path(
    post,
    path = "/vocabulary",
    request_body = SaveVocabularyRequest,
    responses(
        (status = 201, description = "New vocabulary item created", body = VocabularyItemPayload),
        (status = 200, description = "Existing vocabulary item refreshed", body = VocabularyItemPayload),
        (status = 400, description = "Missing original or translation"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn save_vocabulary_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<SaveVocabularyRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let item = req
        .into_new_item()
        .map_err(|e| port_failure("save vocabulary", e))?;

    let store = &app_state.store;
    let existing = store
        .find_by_original_text(&item.original)
        .await
        .map_err(|e| port_failure("save vocabulary", e))?;

    let outcome = merge_saved_word(existing, item, Uuid::new_v4().to_string(), Utc::now());
    let status = match outcome {
        SaveOutcome::Created(_) => StatusCode::CREATED,
        SaveOutcome::Refreshed(_) => StatusCode::OK,
    };

    let saved = store
        .put(outcome.into_record())
        .await
        .map_err(|e| port_failure("save vocabulary", e))?;

    info!(
        "Saved vocabulary item {} ({}), review count {}",
        saved.id, saved.original, saved.review_count
    );
    Ok((status, Json(VocabularyItemPayload::from(saved))))
}

/// Fetch one vocabulary item.
#[utoipa::path(
    get,
    path = "/vocabulary/{id}",
    params(("id" = String, Path, description = "Vocabulary item id")),
    responses(
        (status = 200, description = "The vocabulary item", body = VocabularyItemPayload),
        (status = 404, description = "No item with this id")
    )
)]
pub async fn get_vocabulary_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = app_state
        .store
        .get(&id)
        .await
        .map_err(|e| port_failure("load vocabulary", e))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Vocabulary item {} not found", id)))?;

    Ok(Json(VocabularyItemPayload::from(record)))
}

/// Edit the translation or context of a vocabulary item. Its schedule is kept.
#[utoipa::path(
    put,
    path = "/vocabulary/{id}",
    params(("id" = String, Path, description = "Vocabulary item id")),
    request_body = UpdateVocabularyRequest,
    responses(
        (status = 200, description = "Updated vocabulary item", body = VocabularyItemPayload),
        (status = 400, description = "Empty translation"),
        (status = 404, description = "No item with this id")
    )
)]
pub async fn update_vocabulary_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateVocabularyRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let store = &app_state.store;
    let result = async {
        let record = store
            .get(&id)
            .await?
            .ok_or_else(|| PortError::NotFound(format!("Vocabulary item {} not found", id)))?;
        let edited = VocabularyEdit::from(req).apply(&record)?;
        store.put(edited).await
    }
    .await;

    match result {
        Ok(record) => Ok(Json(VocabularyItemPayload::from(record))),
        Err(e) => Err(port_failure("update vocabulary", e)),
    }
}

/// Delete a vocabulary item.
#[utoipa::path(
    delete,
    path = "/vocabulary/{id}",
    params(("id" = String, Path, description = "Vocabulary item id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No item with this id")
    )
)]
pub async fn delete_vocabulary_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .store
        .delete(&id)
        .await
        .map_err(|e| port_failure("delete vocabulary", e))?;

    info!("Deleted vocabulary item {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Export the whole collection as a JSON array.
#[utoipa::path(
    get,
    path = "/vocabulary/export",
    responses(
        (status = 200, description = "Every vocabulary item", body = [VocabularyItemPayload]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn export_vocabulary_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let records = app_state
        .store
        .list_all()
        .await
        .map_err(|e| port_failure("export vocabulary", e))?;

    let items: Vec<VocabularyItemPayload> = records.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

/// Import items, replacing any with the same id.
#[utoipa::path(
    post,
    path = "/vocabulary/import",
    request_body = [VocabularyItemPayload],
    responses(
        (status = 200, description = "Number of items written", body = ImportResponse),
        (status = 400, description = "An item is missing id, original or translation"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn import_vocabulary_handler(
    State(app_state): State<Arc<AppState>>,
    Json(items): Json<Vec<VocabularyItemPayload>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let records = items
        .into_iter()
        .map(VocabularyItemPayload::into_domain)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| port_failure("import vocabulary", e))?;

    let imported = app_state
        .store
        .put_many(records)
        .await
        .map_err(|e| port_failure("import vocabulary", e))?;

    info!("Imported {} vocabulary items", imported);
    Ok(Json(ImportResponse { imported }))
}
