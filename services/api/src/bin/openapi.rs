//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document of the vocabulary API to disk so the browser
//! client can generate its bindings without a running server.
//!
//! Usage: `openapi [OUTPUT_PATH]` (defaults to `openapi.json`).

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

fn write_document(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let api_doc = ApiDoc::openapi();
    std::fs::write(path, api_doc.to_pretty_json()?)?;
    println!(
        "OpenAPI document with {} paths written to {}",
        api_doc.paths.paths.len(),
        path
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    write_document(&path)
}
