//! crates/vocabulary_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the collaborators the engine
//! is bridged to: the item store and the translator. The engine itself never
//! calls them; the outer layer loads records, runs the pure scheduling
//! functions and writes the results back.

use crate::domain::{Translation, VocabularyRecord};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistent vocabulary collection keyed by record id.
///
/// Each call is atomic per record; concurrent writers resolve last-writer-wins.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list_all(&self) -> PortResult<Vec<VocabularyRecord>>;

    async fn get(&self, id: &str) -> PortResult<Option<VocabularyRecord>>;

    /// Inserts or replaces the record with the same id.
    async fn put(&self, record: VocabularyRecord) -> PortResult<VocabularyRecord>;

    /// Fails with `NotFound` when no record has this id.
    async fn delete(&self, id: &str) -> PortResult<()>;

    /// Case-insensitive exact match on `original`.
    async fn find_by_original_text(&self, text: &str) -> PortResult<Option<VocabularyRecord>>;

    /// Bulk insert-or-replace, used by imports. Returns how many were written.
    async fn put_many(&self, records: Vec<VocabularyRecord>) -> PortResult<usize> {
        let count = records.len();
        for record in records {
            self.put(record).await?;
        }
        Ok(count)
    }
}

#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Translates source-language text into the target language.
    async fn translate(&self, text: &str) -> PortResult<Translation>;
}
