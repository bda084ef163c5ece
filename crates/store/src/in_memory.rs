//! In-memory row store, useful for testing and dry runs.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use taleweave_core::error::PersistenceError;
use taleweave_core::store::{fold_title, NewSummary, SummaryRow, SummaryStore};
use tokio::sync::RwLock;

/// Stores digest rows in a Vec; ids start at 1.
pub struct InMemoryStore {
    rows: Arc<RwLock<Vec<SummaryRow>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummaryStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn insert(&self, summary: NewSummary) -> Result<SummaryRow, PersistenceError> {
        let mut rows = self.rows.write().await;
        let id = rows.last().map_or(1, |r| r.id + 1);
        let row = SummaryRow::from_new(id, Utc::now(), summary);
        rows.push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> Result<Option<SummaryRow>, PersistenceError> {
        Ok(self.rows.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SummaryRow>, PersistenceError> {
        Ok(self.rows.read().await.iter().rev().take(limit).cloned().collect())
    }

    async fn search_title(&self, query: &str) -> Result<Vec<SummaryRow>, PersistenceError> {
        let needle = fold_title(query);
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| fold_title(&r.title).contains(&needle))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize, PersistenceError> {
        Ok(self.rows.read().await.len())
    }
}
