//! Persists a finished digest: one row in the row store, one labelled text
//! export in the summaries folder.
//!
//! The row is the source of truth. A failed export after a successful row
//! write is logged and not retried.

use std::path::PathBuf;
use std::sync::Arc;
use taleweave_core::error::PersistenceError;
use taleweave_core::{ArtifactStore, NewSummary, SummaryRow, SummaryStore};
use tracing::{error, info, warn};

use crate::naming::export_name;
use crate::orchestrator::DigestArtifacts;

/// A stored row plus the path of its text export, when that write succeeded.
#[derive(Debug, Clone)]
pub struct PersistedDigest {
    pub row: SummaryRow,
    pub export_path: Option<PathBuf>,
}

pub struct ResultPersister {
    store: Arc<dyn SummaryStore>,
    artifacts: Arc<dyn ArtifactStore>,
}

impl ResultPersister {
    pub fn new(store: Arc<dyn SummaryStore>, artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self { store, artifacts }
    }

    pub async fn persist(&self, result: &DigestArtifacts) -> Result<PersistedDigest, PersistenceError> {
        let new = NewSummary::new(&result.title, &result.digest, &result.model_name, &result.images);
        let row = self.store.insert(new).await.map_err(|e| {
            error!(title = %result.title, error = %e, "Row write failed");
            e
        })?;
        info!(id = row.id, store = self.store.name(), "Digest row stored");

        let file_name = format!("{}.txt", export_name(&result.base_name, &row.model_name, &row.timestamp));
        let export_path = match self
            .artifacts
            .save_digest_text(&file_name, &result.digest.to_labelled_text())
            .await
        {
            Ok(path) => {
                info!(path = %path.display(), "Digest text exported");
                Some(path)
            }
            Err(e) => {
                warn!(id = row.id, file = %file_name, error = %e, "Digest text export failed; row kept");
                None
            }
        };

        Ok(PersistedDigest { row, export_path })
    }
}
