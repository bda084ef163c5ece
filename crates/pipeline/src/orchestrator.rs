//! The digest pipeline.
//!
//! Stages run strictly in order for one document:
//!
//! 1. validate: rejected documents never reach a model
//! 2. summarize: fatal on failure
//! 3. translate each section: falls back to the untranslated text
//! 4. build a budgeted prompt, synthesize, store the image: falls back to no image
//!
//! [`Pipeline::process`] then hands the result to the [`ResultPersister`].

use chrono::Utc;
use std::sync::Arc;
use taleweave_core::error::{PersistenceError, SynthesisError};
use taleweave_core::{
    Adapters, ArtifactStore, Caption, Digest, Document, ImageRef, InputLimits, Result,
    SectionKind, Sections, SummaryStore,
};
use tracing::{error, info, warn};

use crate::naming::artifact_name;
use crate::outcome::StageOutcome;
use crate::persister::{PersistedDigest, ResultPersister};
use crate::text::clean_text;
use crate::token_budget::TokenBudget;

/// A recoverable stage failure that was replaced by its fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageNote {
    pub section: SectionKind,
    pub stage: &'static str,
    pub cause: String,
}

/// Everything one run produced, ready to persist.
#[derive(Debug, Clone)]
pub struct DigestArtifacts {
    pub title: String,
    pub base_name: String,
    pub digest: Digest,
    pub captions: Sections<Caption>,
    pub images: Sections<Option<ImageRef>>,
    /// The summarizer that produced the digest.
    pub model_name: String,
    pub notes: Vec<StageNote>,
}

impl DigestArtifacts {
    pub fn image_count(&self) -> usize {
        self.images.iter().filter(|(_, image)| image.is_some()).count()
    }
}

pub struct Pipeline {
    adapters: Adapters,
    artifacts: Arc<dyn ArtifactStore>,
    persister: ResultPersister,
    budget: TokenBudget,
    limits: InputLimits,
}

impl Pipeline {
    pub fn new(
        adapters: Adapters,
        store: Arc<dyn SummaryStore>,
        artifacts: Arc<dyn ArtifactStore>,
        budget: TokenBudget,
        limits: InputLimits,
    ) -> Self {
        Self {
            persister: ResultPersister::new(store, artifacts.clone()),
            adapters,
            artifacts,
            budget,
            limits,
        }
    }

    /// Run every stage and persist the result.
    pub async fn process(&self, document: &Document) -> Result<PersistedDigest> {
        let result = self.run(document).await?;
        Ok(self.persist(&result).await?)
    }

    /// Store the row and write the export for an earlier [`Pipeline::run`].
    pub async fn persist(&self, result: &DigestArtifacts) -> std::result::Result<PersistedDigest, PersistenceError> {
        self.persister.persist(result).await
    }

    /// Run every stage without persisting.
    pub async fn run(&self, document: &Document) -> Result<DigestArtifacts> {
        document.validate(&self.limits).map_err(|e| {
            warn!(title = %document.title, error = %e, "Document rejected");
            e
        })?;

        let text = clean_text(&document.text);
        info!(
            title = %document.title,
            chars = text.chars().count(),
            summarizer = self.adapters.summarizer.name(),
            "Summarizing"
        );
        let digest = self.adapters.summarizer.summarize(&text).await.map_err(|e| {
            error!(title = %document.title, error = %e, "Summarization failed");
            e
        })?;

        let captions = Sections::new(
            self.translate_section(SectionKind::Introduction, digest.introduction()).await,
            self.translate_section(SectionKind::Development, digest.development()).await,
            self.translate_section(SectionKind::Conclusion, digest.conclusion()).await,
        );

        let images = Sections::new(
            self.illustrate_section(SectionKind::Introduction, &captions.introduction, &document.base_name)
                .await,
            self.illustrate_section(SectionKind::Development, &captions.development, &document.base_name)
                .await,
            self.illustrate_section(SectionKind::Conclusion, &captions.conclusion, &document.base_name)
                .await,
        );

        let mut notes = Vec::new();
        collect_notes(&mut notes, "translate", &captions);
        collect_notes(&mut notes, "illustrate", &images);

        let result = DigestArtifacts {
            title: document.title.clone(),
            base_name: document.base_name.clone(),
            digest,
            captions: captions.map(|_, outcome| outcome.into_value()),
            images: images.map(|_, outcome| outcome.into_value()),
            model_name: self.adapters.summarizer.name().to_string(),
            notes,
        };
        info!(
            title = %result.title,
            images = result.image_count(),
            fallbacks = result.notes.len(),
            "Pipeline run complete"
        );
        Ok(result)
    }

    async fn translate_section(&self, kind: SectionKind, text: &str) -> StageOutcome<Caption> {
        let outcome = StageOutcome::from_result(
            self.adapters.translator.translate(text).await.map(Caption::translated),
            || Caption::untranslated(text),
        );
        if let Some(cause) = outcome.cause() {
            warn!(section = %kind, error = %cause, "Translation failed; using original text");
        }
        outcome
    }

    async fn illustrate_section(
        &self,
        kind: SectionKind,
        caption: &StageOutcome<Caption>,
        base_name: &str,
    ) -> StageOutcome<Option<ImageRef>> {
        let outcome = StageOutcome::from_result(
            self.illustrate(kind, &caption.value().text, base_name).await.map(Some),
            || None,
        );
        match outcome.cause() {
            Some(cause) => warn!(section = %kind, error = %cause, "Image synthesis failed; no image"),
            None => info!(section = %kind, "Image stored"),
        }
        outcome
    }

    async fn illustrate(
        &self,
        kind: SectionKind,
        caption: &str,
        base_name: &str,
    ) -> std::result::Result<ImageRef, SynthesisError> {
        let prompt = self.budget.build(caption, self.adapters.tokenizer.as_ref())?;
        let image = self.adapters.synthesizer.synthesize(&prompt.text).await?;

        let file_name = format!(
            "{}.png",
            artifact_name(base_name, kind.qualifier(), self.adapters.synthesizer.name(), &Utc::now())
        );
        self.artifacts
            .save_image(&file_name, &image)
            .await
            .map_err(|e| SynthesisError::Store(e.to_string()))
    }
}

fn collect_notes<T>(notes: &mut Vec<StageNote>, stage: &'static str, outcomes: &Sections<StageOutcome<T>>) {
    for (section, outcome) in outcomes.iter() {
        if let Some(cause) = outcome.cause() {
            notes.push(StageNote {
                section,
                stage,
                cause: cause.to_string(),
            });
        }
    }
}
