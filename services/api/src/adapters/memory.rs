//! services/api/src/adapters/memory.rs
//!
//! An `ItemStore` kept in process memory. Used when no database is configured
//! and as the store behind the HTTP tests.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use vocabulary_core::domain::VocabularyRecord;
use vocabulary_core::ports::{ItemStore, PortError, PortResult};

#[derive(Default)]
pub struct InMemoryItemStore {
    items: RwLock<HashMap<String, VocabularyRecord>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `records`.
    pub fn with_records(records: impl IntoIterator<Item = VocabularyRecord>) -> Self {
        let items = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn list_all(&self) -> PortResult<Vec<VocabularyRecord>> {
        let mut records: Vec<_> = self.items.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    async fn get(&self, id: &str) -> PortResult<Option<VocabularyRecord>> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn put(&self, record: VocabularyRecord) -> PortResult<VocabularyRecord> {
        self.items
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &str) -> PortResult<()> {
        self.items
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(format!("Vocabulary item {} not found", id)))
    }

    async fn find_by_original_text(&self, text: &str) -> PortResult<Option<VocabularyRecord>> {
        let needle = text.to_lowercase();
        let items = self.items.read().await;
        let mut matches: Vec<_> = items
            .values()
            .filter(|r| r.original.to_lowercase() == needle)
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matches.first().map(|r| (*r).clone()))
    }

    async fn put_many(&self, records: Vec<VocabularyRecord>) -> PortResult<usize> {
        let mut items = self.items.write().await;
        let count = records.len();
        for record in records {
            items.insert(record.id.clone(), record);
        }
        Ok(count)
    }
}
