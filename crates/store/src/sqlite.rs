//! SQLite row store for digests.
//!
//! One table, `summaries`, with one row per processed document. Rows are
//! append-only; the store assigns `id` and `timestamp` at insert time.
//! SQLite's `lower()` only folds ASCII, so each row also keeps a `title_key`
//! folded in Rust, and title search compares against that.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use taleweave_core::error::PersistenceError;
use taleweave_core::store::{fold_title, NewSummary, SummaryRow, SummaryStore};
use tracing::{debug, info};

/// A production SQLite digest store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `url` and run migrations.
    ///
    /// Accepts `sqlite://summaries.db`, a bare path, or `sqlite::memory:`.
    pub async fn new(url: &str) -> Result<Self, PersistenceError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| PersistenceError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // Every connection to an in-memory database is a separate database.
        let max_connections = if url.contains(":memory:") { 1 } else { 4 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| PersistenceError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite digest store initialized at {url}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, PersistenceError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS summaries (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                title_key       TEXT NOT NULL,
                introduction    TEXT NOT NULL,
                development     TEXT NOT NULL,
                conclusion      TEXT NOT NULL,
                timestamp       TEXT NOT NULL,
                model_name      TEXT NOT NULL,
                img_intro       TEXT NOT NULL DEFAULT '',
                img_development TEXT NOT NULL DEFAULT '',
                img_conclusion  TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| PersistenceError::MigrationFailed(format!("summaries table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_summaries_timestamp ON summaries(timestamp DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| PersistenceError::MigrationFailed(format!("timestamp index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    /// Parse a `SummaryRow` from a SQLite row.
    fn row_to_summary(row: &sqlx::sqlite::SqliteRow) -> Result<SummaryRow, PersistenceError> {
        let text = |column: &str| -> Result<String, PersistenceError> {
            row.try_get(column)
                .map_err(|e| PersistenceError::QueryFailed(format!("{column} column: {e}")))
        };

        let id: i64 = row
            .try_get("id")
            .map_err(|e| PersistenceError::QueryFailed(format!("id column: {e}")))?;
        let timestamp_str = text("timestamp")?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| PersistenceError::QueryFailed(format!("timestamp '{timestamp_str}': {e}")))?;

        Ok(SummaryRow {
            id,
            title: text("title")?,
            introduction: text("introduction")?,
            development: text("development")?,
            conclusion: text("conclusion")?,
            timestamp,
            model_name: text("model_name")?,
            img_intro: text("img_intro")?,
            img_development: text("img_development")?,
            img_conclusion: text("img_conclusion")?,
        })
    }

    /// Escape LIKE wildcards so a title query matches literally.
    fn like_pattern(query: &str) -> String {
        let escaped = fold_title(query)
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{escaped}%")
    }
}

#[async_trait]
impl SummaryStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn insert(&self, summary: NewSummary) -> Result<SummaryRow, PersistenceError> {
        let timestamp = Utc::now().trunc_subsecs(6);
        let stamp = timestamp.to_rfc3339_opts(SecondsFormat::Micros, true);

        let result = sqlx::query(
            r#"
            INSERT INTO summaries (
                title, title_key, introduction, development, conclusion, timestamp,
                model_name, img_intro, img_development, img_conclusion
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&summary.title)
        .bind(fold_title(&summary.title))
        .bind(&summary.introduction)
        .bind(&summary.development)
        .bind(&summary.conclusion)
        .bind(&stamp)
        .bind(&summary.model_name)
        .bind(&summary.img_intro)
        .bind(&summary.img_development)
        .bind(&summary.img_conclusion)
        .execute(&self.pool)
        .await
        .map_err(|e| PersistenceError::Storage(format!("INSERT failed: {e}")))?;

        let id = result.last_insert_rowid();
        debug!(id, title = %summary.title, "Stored summary row");
        Ok(SummaryRow::from_new(id, timestamp, summary))
    }

    async fn get(&self, id: i64) -> Result<Option<SummaryRow>, PersistenceError> {
        let row = sqlx::query("SELECT * FROM summaries WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PersistenceError::QueryFailed(format!("GET by ID: {e}")))?;

        match row {
            Some(ref r) => Ok(Some(Self::row_to_summary(r)?)),
            None => Ok(None),
        }
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SummaryRow>, PersistenceError> {
        let rows = sqlx::query("SELECT * FROM summaries ORDER BY timestamp DESC, id DESC LIMIT ?1")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PersistenceError::QueryFailed(format!("recent: {e}")))?;

        rows.iter().map(Self::row_to_summary).collect()
    }

    async fn search_title(&self, query: &str) -> Result<Vec<SummaryRow>, PersistenceError> {
        let rows = sqlx::query(
            "SELECT * FROM summaries WHERE title_key LIKE ?1 ESCAPE '\\' ORDER BY timestamp DESC, id DESC",
        )
        .bind(Self::like_pattern(query))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PersistenceError::QueryFailed(format!("title search: {e}")))?;

        rows.iter().map(Self::row_to_summary).collect()
    }

    async fn count(&self) -> Result<usize, PersistenceError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM summaries")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PersistenceError::QueryFailed(format!("COUNT: {e}")))?;

        let cnt: i64 = row
            .try_get("cnt")
            .map_err(|e| PersistenceError::QueryFailed(format!("cnt column: {e}")))?;

        Ok(cnt as usize)
    }
}
