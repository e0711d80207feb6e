//! services/api/src/web/router.rs
//!
//! Assembles every route of the vocabulary API into one `Router`.

use crate::web::{rest, rest::ApiDoc, review, state::AppState, study, translate};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the application router, including the Swagger UI.
///
/// Cross-origin policy is left to the caller.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    let vocabulary_routes = Router::new()
        .route(
            "/vocabulary",
            get(rest::list_vocabulary_handler).post(rest::save_vocabulary_handler),
        )
        // Static segments take priority over `/{id}` in axum's matcher.
        .route("/vocabulary/export", get(rest::export_vocabulary_handler))
        .route("/vocabulary/import", post(rest::import_vocabulary_handler))
        .route(
            "/vocabulary/review",
            get(review::study_queue_handler).post(review::review_handler),
        )
        .route(
            "/vocabulary/{id}",
            get(rest::get_vocabulary_handler)
                .put(rest::update_vocabulary_handler)
                .delete(rest::delete_vocabulary_handler),
        );

    let study_routes = Router::new()
        .route("/study/sessions", post(study::start_session_handler))
        .route("/study/sessions/{id}", get(study::get_session_handler))
        .route(
            "/study/sessions/{id}/responses",
            post(study::respond_handler),
        )
        .route(
            "/study/sessions/{id}/restart",
            post(study::restart_session_handler),
        );

    let api_routes = Router::new()
        .merge(vocabulary_routes)
        .merge(study_routes)
        .route("/translate", get(translate::translate_handler))
        .with_state(app_state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
