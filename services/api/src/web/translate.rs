//! services/api/src/web/translate.rs
//!
//! Word lookup for subtitle clicks.

use crate::web::{
    protocol::{TranslateQuery, TranslationResponse},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::error;

/// Translate a word or phrase with the configured translator.
#[utoipa::path(
    get,
    path = "/translate",
    params(TranslateQuery),
    responses(
        (status = 200, description = "Translation with alternatives", body = TranslationResponse),
        (status = 400, description = "Missing text"),
        (status = 502, description = "Translation service failed")
    )
)]
pub async fn translate_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<TranslateQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let text = query
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Missing text to translate".to_string()))?;

    match app_state.translator.translate(text).await {
        Ok(translation) => Ok(Json(TranslationResponse::from(translation))),
        Err(e) => {
            error!("Translation of '{}' failed: {:?}", text, e);
            Err((StatusCode::BAD_GATEWAY, "Translation failed".to_string()))
        }
    }
}
