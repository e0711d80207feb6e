pub mod protocol;
pub mod rest;
pub mod review;
pub mod router;
pub mod state;
pub mod study;
pub mod translate;

use axum::http::StatusCode;
use tracing::error;
use vocabulary_core::ports::PortError;

// Re-export the router builder to make it easily accessible
// to the binary that will build the web server.
pub use router::api_router;

/// Maps a port failure to the status and message a handler returns.
pub(crate) fn port_failure(action: &str, e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        PortError::Unexpected(detail) => {
            error!("Failed to {}: {}", action, detail);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to {}", action),
            )
        }
    }
}
