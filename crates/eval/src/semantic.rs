//! Embedding-based semantic similarity.
//!
//! Both texts are split into sentences and embedded in one call. Every
//! candidate sentence is aligned greedily to its most similar reference
//! sentence (precision) and every reference sentence to its most similar
//! candidate sentence (recall).

use async_trait::async_trait;
use std::sync::Arc;
use taleweave_core::error::ScoringError;
use taleweave_core::{Embedder, ScoreTriple, SemanticScorer};

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1]. Returns 0.0 for empty or mismatched vectors
/// and for zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Split text into trimmed, non-empty sentences on `.`, `!`, `?` and newlines.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .map(str::to_string)
        .collect()
}

fn max_of(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, f64::max)
}

/// Mean of per-sentence best scores.
fn mean_best(rows: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    rows.sum::<f64>() / count as f64
}

pub struct GreedyAlignmentScorer {
    embedder: Arc<dyn Embedder>,
}

impl GreedyAlignmentScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }
}

#[async_trait]
impl SemanticScorer for GreedyAlignmentScorer {
    fn name(&self) -> &str {
        self.embedder.name()
    }

    async fn score(&self, candidate: &str, reference: &str) -> Result<ScoreTriple, ScoringError> {
        let cand = split_sentences(candidate);
        let refs = split_sentences(reference);
        if cand.is_empty() {
            return Err(ScoringError::EmptyInput("candidate".into()));
        }
        if refs.is_empty() {
            return Err(ScoringError::EmptyInput("reference".into()));
        }

        let inputs: Vec<String> = cand.iter().chain(refs.iter()).cloned().collect();
        let vectors = self.embedder.embed(&inputs).await?;
        if vectors.len() != inputs.len() {
            return Err(ScoringError::DimensionMismatch {
                expected: inputs.len(),
                got: vectors.len(),
            });
        }
        let (cand_vecs, ref_vecs) = vectors.split_at(cand.len());

        let sims: Vec<Vec<f64>> = cand_vecs
            .iter()
            .map(|c| {
                ref_vecs
                    .iter()
                    .map(|r| cosine_similarity(c, r) as f64)
                    .collect()
            })
            .collect();

        let precision = mean_best(sims.iter().map(|row| max_of(row.iter().copied())), cand.len());
        let recall = mean_best(
            (0..refs.len()).map(|j| max_of(sims.iter().map(|row| row[j]))),
            refs.len(),
        );

        Ok(ScoreTriple::from_precision_recall(precision, recall))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Embeds a sentence as letter counts of a, b and c.
    struct LetterEmbedder {
        calls: Mutex<usize>,
    }

    impl LetterEmbedder {
        fn new() -> Self {
            Self { calls: Mutex::new(0) }
        }
    }

    #[async_trait]
    impl Embedder for LetterEmbedder {
        fn name(&self) -> &str {
            "letters"
        }

        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ScoringError> {
            *self.calls.lock().unwrap() += 1;
            Ok(inputs
                .iter()
                .map(|s| {
                    ['a', 'b', 'c']
                        .iter()
                        .map(|l| s.chars().filter(|c| c == l).count() as f32)
                        .collect()
                })
                .collect())
        }
    }

    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        fn name(&self) -> &str {
            "short"
        }

        async fn embed(&self, _inputs: &[String]) -> Result<Vec<Vec<f32>>, ScoringError> {
            Ok(vec![vec![1.0]])
        }
    }

    #[test]
    fn cosine_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn sentences_split_and_trimmed() {
        assert_eq!(
            split_sentences("Bir kız varmış. Kurt geldi!\nSon? ..."),
            vec!["Bir kız varmış", "Kurt geldi", "Son"]
        );
    }

    #[tokio::test]
    async fn identical_texts_score_one_in_one_call() {
        let embedder = Arc::new(LetterEmbedder::new());
        let scorer = GreedyAlignmentScorer::new(embedder.clone());
        let s = scorer.score("aab. bc.", "aab. bc.").await.unwrap();
        assert!((s.f1 - 1.0).abs() < 1e-6);
        assert_eq!(*embedder.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn precision_and_recall_differ_when_coverage_differs() {
        let scorer = GreedyAlignmentScorer::new(Arc::new(LetterEmbedder::new()));
        // candidate covers only the "a" reference sentence
        let s = scorer.score("aaa.", "aaa. ccc.").await.unwrap();
        assert!((s.precision - 1.0).abs() < 1e-6);
        assert!((s.recall - 0.5).abs() < 1e-6);
    }

    #[tokio::test]
    async fn empty_side_is_an_error() {
        let scorer = GreedyAlignmentScorer::new(Arc::new(LetterEmbedder::new()));
        assert!(matches!(
            scorer.score(" . ", "aaa").await,
            Err(ScoringError::EmptyInput(_))
        ));
    }

    #[tokio::test]
    async fn wrong_vector_count_is_an_error() {
        let scorer = GreedyAlignmentScorer::new(Arc::new(ShortEmbedder));
        assert!(matches!(
            scorer.score("a. b.", "c.").await,
            Err(ScoringError::DimensionMismatch { expected: 3, got: 1 })
        ));
    }
}
