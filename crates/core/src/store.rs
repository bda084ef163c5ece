//! Storage traits: the row store for digests and the file store for
//! exported artifacts.
//!
//! Both are append-only from the pipeline's point of view: a persisted row or
//! file is never mutated in place.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::adapter::ImageData;
use crate::digest::{Digest, ImageRef, SectionKind, Sections};
use crate::error::PersistenceError;

/// A digest row about to be inserted. The store assigns `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSummary {
    pub title: String,
    pub introduction: String,
    pub development: String,
    pub conclusion: String,
    pub model_name: String,
    /// Empty string when the image for that section is absent.
    pub img_intro: String,
    pub img_development: String,
    pub img_conclusion: String,
}

impl NewSummary {
    pub fn new(
        title: impl Into<String>,
        digest: &Digest,
        model_name: impl Into<String>,
        images: &Sections<Option<ImageRef>>,
    ) -> Self {
        let image = |kind: SectionKind| {
            images
                .get(kind)
                .as_ref()
                .map(|r| r.0.clone())
                .unwrap_or_default()
        };
        Self {
            title: title.into(),
            introduction: digest.introduction().to_string(),
            development: digest.development().to_string(),
            conclusion: digest.conclusion().to_string(),
            model_name: model_name.into(),
            img_intro: image(SectionKind::Introduction),
            img_development: image(SectionKind::Development),
            img_conclusion: image(SectionKind::Conclusion),
        }
    }
}

/// A persisted digest row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub id: i64,
    pub title: String,
    pub introduction: String,
    pub development: String,
    pub conclusion: String,
    /// Assigned by the store at insert time.
    pub timestamp: DateTime<Utc>,
    pub model_name: String,
    pub img_intro: String,
    pub img_development: String,
    pub img_conclusion: String,
}

impl SummaryRow {
    pub fn from_new(id: i64, timestamp: DateTime<Utc>, new: NewSummary) -> Self {
        Self {
            id,
            title: new.title,
            introduction: new.introduction,
            development: new.development,
            conclusion: new.conclusion,
            timestamp,
            model_name: new.model_name,
            img_intro: new.img_intro,
            img_development: new.img_development,
            img_conclusion: new.img_conclusion,
        }
    }

    /// Image references that are present, in section order.
    pub fn image_refs(&self) -> Vec<&str> {
        [&self.img_intro, &self.img_development, &self.img_conclusion]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect()
    }
}

/// Case-folds a title for search: Unicode lowercase, minus the combining dot
/// that `İ` lowercases to, so `İnatçı` and `inatçı` fold alike.
pub fn fold_title(title: &str) -> String {
    title.to_lowercase().replace('\u{307}', "")
}

/// The row store for digests.
///
/// Implementations: SQLite, in-memory (for testing).
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Insert a row; returns it with its assigned id and timestamp.
    async fn insert(&self, summary: NewSummary) -> Result<SummaryRow, PersistenceError>;

    async fn get(&self, id: i64) -> Result<Option<SummaryRow>, PersistenceError>;

    /// Most recent rows first.
    async fn recent(&self, limit: usize) -> Result<Vec<SummaryRow>, PersistenceError>;

    /// Case-insensitive substring match on the title.
    async fn search_title(&self, query: &str) -> Result<Vec<SummaryRow>, PersistenceError>;

    async fn count(&self) -> Result<usize, PersistenceError>;
}

/// The file store for images and exported digest text.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    fn name(&self) -> &str;

    /// Write an image under `file_name`; returns its URL-friendly reference.
    async fn save_image(&self, file_name: &str, image: &ImageData) -> Result<ImageRef, PersistenceError>;

    /// Write the labelled digest export under `file_name`.
    async fn save_digest_text(&self, file_name: &str, text: &str) -> Result<PathBuf, PersistenceError>;
}
