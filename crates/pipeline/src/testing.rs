//! Deterministic stub adapters and stores for pipeline tests.

use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use taleweave_core::error::{
    AdapterError, PersistenceError, SummarizationError, SynthesisError, TokenizerError,
    TranslationError,
};
use taleweave_core::{
    Adapters, ArtifactStore, Digest, ImageData, ImageRef, ImageSynthesizer, NewSummary,
    Summarizer, SummaryRow, SummaryStore, Tokenizer, Translator,
};

/// Splits on whitespace; joins with single spaces.
pub struct SpaceTokenizer;

impl Tokenizer for SpaceTokenizer {
    fn name(&self) -> &str {
        "space"
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizerError> {
        Ok(text.split_whitespace().map(String::from).collect())
    }

    fn detokenize(&self, tokens: &[String]) -> String {
        tokens.join(" ")
    }
}

/// Returns a fixed digest, or a fixed failure, and counts calls.
pub struct ScriptedSummarizer {
    result: Result<Digest, SummarizationError>,
    calls: Mutex<usize>,
}

impl ScriptedSummarizer {
    pub fn new(intro: &str, dev: &str, conc: &str) -> Self {
        Self {
            result: Digest::new(intro, dev, conc),
            calls: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: Err(SummarizationError::Adapter(AdapterError::Network(
                "connection refused".into(),
            ))),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Summarizer for ScriptedSummarizer {
    fn name(&self) -> &str {
        "stub-summarizer"
    }

    async fn summarize(&self, _text: &str) -> Result<Digest, SummarizationError> {
        *self.calls.lock().unwrap() += 1;
        self.result.clone()
    }
}

/// Prefixes `EN:`; fails for any input containing `fail_on`.
pub struct PrefixTranslator {
    fail_on: Option<String>,
}

impl PrefixTranslator {
    pub fn new() -> Self {
        Self { fail_on: None }
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
        }
    }
}

#[async_trait]
impl Translator for PrefixTranslator {
    fn name(&self) -> &str {
        "stub-translator"
    }

    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        match &self.fail_on {
            Some(marker) if text.contains(marker.as_str()) => Err(TranslationError::Adapter(
                AdapterError::Api {
                    status_code: 500,
                    message: "translator down".into(),
                },
            )),
            _ => Ok(format!("EN: {text}")),
        }
    }
}

/// Returns the prompt bytes as the image; fails for prompts containing `fail_on`.
/// Records every prompt it receives.
pub struct RecordingSynthesizer {
    fail_on: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self {
            fail_on: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSynthesizer for RecordingSynthesizer {
    fn name(&self) -> &str {
        "stub/diffusion-v1"
    }

    async fn synthesize(&self, prompt: &str) -> Result<ImageData, SynthesisError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.fail_on {
            Some(marker) if prompt.contains(marker.as_str()) => Err(SynthesisError::NoImage),
            _ => Ok(ImageData {
                bytes: prompt.as_bytes().to_vec(),
            }),
        }
    }
}

/// Row store that keeps rows in memory and can be told to reject inserts.
#[derive(Default)]
pub struct RecordingStore {
    rows: Mutex<Vec<SummaryRow>>,
    reject_inserts: bool,
}

impl RecordingStore {
    pub fn rejecting() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            reject_inserts: true,
        }
    }

    pub fn rows(&self) -> Vec<SummaryRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummaryStore for RecordingStore {
    fn name(&self) -> &str {
        "recording"
    }

    async fn insert(&self, summary: NewSummary) -> Result<SummaryRow, PersistenceError> {
        if self.reject_inserts {
            return Err(PersistenceError::Storage("disk full".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = SummaryRow::from_new(rows.len() as i64 + 1, Utc::now(), summary);
        rows.push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> Result<Option<SummaryRow>, PersistenceError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SummaryRow>, PersistenceError> {
        Ok(self.rows.lock().unwrap().iter().rev().take(limit).cloned().collect())
    }

    async fn search_title(&self, query: &str) -> Result<Vec<SummaryRow>, PersistenceError> {
        let needle = query.to_lowercase();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize, PersistenceError> {
        Ok(self.rows.lock().unwrap().len())
    }
}

/// Artifact store that keeps files in memory; exports can be made to fail.
#[derive(Default)]
pub struct MemoryArtifacts {
    images: Mutex<Vec<(String, Vec<u8>)>>,
    exports: Mutex<Vec<(String, String)>>,
    fail_exports: bool,
}

impl MemoryArtifacts {
    pub fn failing_exports() -> Self {
        Self {
            fail_exports: true,
            ..Self::default()
        }
    }

    pub fn image_names(&self) -> Vec<String> {
        self.images.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn exports(&self) -> Vec<(String, String)> {
        self.exports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifacts {
    fn name(&self) -> &str {
        "memory"
    }

    async fn save_image(&self, file_name: &str, image: &ImageData) -> Result<ImageRef, PersistenceError> {
        self.images
            .lock()
            .unwrap()
            .push((file_name.to_string(), image.bytes.clone()));
        Ok(ImageRef(format!("images/{file_name}")))
    }

    async fn save_digest_text(&self, file_name: &str, text: &str) -> Result<PathBuf, PersistenceError> {
        if self.fail_exports {
            return Err(PersistenceError::Export("read-only folder".into()));
        }
        self.exports
            .lock()
            .unwrap()
            .push((file_name.to_string(), text.to_string()));
        Ok(PathBuf::from("summaries").join(file_name))
    }
}

pub fn adapters(
    summarizer: Arc<ScriptedSummarizer>,
    translator: Arc<PrefixTranslator>,
    synthesizer: Arc<RecordingSynthesizer>,
) -> Adapters {
    Adapters {
        summarizer,
        translator,
        synthesizer,
        tokenizer: Arc::new(SpaceTokenizer),
    }
}
