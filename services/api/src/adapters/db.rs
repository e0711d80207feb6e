//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ItemStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use vocabulary_core::domain::VocabularyRecord;
use vocabulary_core::ports::{ItemStore, PortError, PortResult};

const SELECT_COLUMNS: &str = "id, original, translation, context, media_timestamp, video_id, \
     date_added, review_count, last_reviewed";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ItemStore` port.
#[derive(Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    /// Creates a new `PgItemStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct VocabularyRow {
    id: String,
    original: String,
    translation: String,
    context: String,
    media_timestamp: f64,
    video_id: String,
    date_added: Option<DateTime<Utc>>,
    review_count: i32,
    last_reviewed: Option<DateTime<Utc>>,
}

impl VocabularyRow {
    fn to_domain(self) -> VocabularyRecord {
        VocabularyRecord {
            id: self.id,
            original: self.original,
            translation: self.translation,
            context: self.context,
            timestamp: self.media_timestamp,
            video_id: self.video_id,
            date_added: self.date_added,
            review_count: self.review_count.max(0) as u32,
            last_reviewed: self.last_reviewed,
        }
    }
}

fn review_count_column(record: &VocabularyRecord) -> PortResult<i32> {
    i32::try_from(record.review_count).map_err(|_| {
        PortError::InvalidInput(format!(
            "review count {} is out of range for {}",
            record.review_count, record.id
        ))
    })
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn upsert_sql() -> String {
    format!(
        "INSERT INTO vocabulary_items \
             (id, original, translation, context, media_timestamp, video_id, \
              date_added, review_count, last_reviewed) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (id) DO UPDATE SET \
             original = EXCLUDED.original, \
             translation = EXCLUDED.translation, \
             context = EXCLUDED.context, \
             media_timestamp = EXCLUDED.media_timestamp, \
             video_id = EXCLUDED.video_id, \
             date_added = EXCLUDED.date_added, \
             review_count = EXCLUDED.review_count, \
             last_reviewed = EXCLUDED.last_reviewed \
         RETURNING {SELECT_COLUMNS}"
    )
}

//=========================================================================================
// `ItemStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ItemStore for PgItemStore {
    async fn list_all(&self) -> PortResult<Vec<VocabularyRecord>> {
        let rows = sqlx::query_as::<_, VocabularyRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM vocabulary_items ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(rows.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get(&self, id: &str) -> PortResult<Option<VocabularyRecord>> {
        let row = sqlx::query_as::<_, VocabularyRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM vocabulary_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(row.map(|r| r.to_domain()))
    }

    async fn put(&self, record: VocabularyRecord) -> PortResult<VocabularyRecord> {
        let review_count = review_count_column(&record)?;
        let row = sqlx::query_as::<_, VocabularyRow>(&upsert_sql())
            .bind(&record.id)
            .bind(&record.original)
            .bind(&record.translation)
            .bind(&record.context)
            .bind(record.timestamp)
            .bind(&record.video_id)
            .bind(record.date_added)
            .bind(review_count)
            .bind(record.last_reviewed)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;

        debug!("Stored vocabulary item {}", row.id);
        Ok(row.to_domain())
    }

    async fn delete(&self, id: &str) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM vocabulary_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Vocabulary item {} not found", id)));
        }
        Ok(())
    }

    async fn find_by_original_text(&self, text: &str) -> PortResult<Option<VocabularyRecord>> {
        let row = sqlx::query_as::<_, VocabularyRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM vocabulary_items \
             WHERE lower(original) = lower($1) ORDER BY id ASC LIMIT 1"
        ))
        .bind(text)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(row.map(|r| r.to_domain()))
    }

    async fn put_many(&self, records: Vec<VocabularyRecord>) -> PortResult<usize> {
        let sql = upsert_sql();
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let count = records.len();

        for record in records {
            let review_count = review_count_column(&record)?;
            sqlx::query(&sql)
                .bind(&record.id)
                .bind(&record.original)
                .bind(&record.translation)
                .bind(&record.context)
                .bind(record.timestamp)
                .bind(&record.video_id)
                .bind(record.date_added)
                .bind(review_count)
                .bind(record.last_reviewed)
                .execute(&mut *tx)
                .await
                .map_err(unexpected)?;
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(count)
    }
}
