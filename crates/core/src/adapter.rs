//! Capability traits: the abstraction over the external models.
//!
//! Each model the system talks to is a single-method capability. Production
//! implementations call out to pretrained models over HTTP; tests plug in
//! deterministic stubs. Instances are built once at startup and handed to the
//! pipeline and the evaluation harness as `Arc<dyn Trait>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::digest::Digest;
use crate::error::{ScoringError, SummarizationError, SynthesisError, TokenizerError, TranslationError};

/// Turns a document's text into a three-section digest.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// A human-readable name (e.g. the model identifier).
    fn name(&self) -> &str;

    async fn summarize(&self, text: &str) -> Result<Digest, SummarizationError>;
}

/// Translates one section into the caption language.
#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    async fn translate(&self, text: &str) -> Result<String, TranslationError>;
}

/// Raw image bytes produced by a synthesizer (PNG encoded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
}

/// Renders a prompt into an image.
#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    fn name(&self) -> &str;

    async fn synthesize(&self, prompt: &str) -> Result<ImageData, SynthesisError>;
}

/// A precision / recall / F1 triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTriple {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ScoreTriple {
    /// Build a triple from precision and recall; F1 is their harmonic mean.
    pub fn from_precision_recall(precision: f64, recall: f64) -> Self {
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Round every component to `places` decimal places.
    pub fn rounded(self, places: i32) -> Self {
        let factor = 10f64.powi(places);
        let round = |v: f64| (v * factor).round() / factor;
        Self {
            precision: round(self.precision),
            recall: round(self.recall),
            f1: round(self.f1),
        }
    }
}

/// Compares two texts semantically.
#[async_trait]
pub trait SemanticScorer: Send + Sync {
    fn name(&self) -> &str;

    async fn score(&self, candidate: &str, reference: &str) -> Result<ScoreTriple, ScoringError>;
}

/// Produces one embedding vector per input text.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ScoringError>;
}

/// Splits text into the synthesizer's token units and joins them back.
///
/// `detokenize` is lossy only at the cut boundary: re-tokenizing the output
/// of `detokenize(&tokens)` yields `tokens` again for any prefix produced by
/// `tokenize`.
pub trait Tokenizer: Send + Sync {
    fn name(&self) -> &str;

    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizerError>;

    fn detokenize(&self, tokens: &[String]) -> String;
}

/// The model-backed capabilities one pipeline run needs.
#[derive(Clone)]
pub struct Adapters {
    pub summarizer: Arc<dyn Summarizer>,
    pub translator: Arc<dyn Translator>,
    pub synthesizer: Arc<dyn ImageSynthesizer>,
    pub tokenizer: Arc<dyn Tokenizer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f1_is_harmonic_mean() {
        let t = ScoreTriple::from_precision_recall(0.5, 1.0);
        assert!((t.f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn zero_precision_and_recall_gives_zero_f1() {
        assert_eq!(ScoreTriple::from_precision_recall(0.0, 0.0), ScoreTriple::zero());
    }

    #[test]
    fn rounding_to_four_places() {
        let t = ScoreTriple {
            precision: 0.123456,
            recall: 0.99996,
            f1: 1.0 / 3.0,
        }
        .rounded(4);
        assert_eq!(t.precision, 0.1235);
        assert_eq!(t.recall, 1.0);
        assert_eq!(t.f1, 0.3333);
    }
}
