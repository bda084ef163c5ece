//! Scores one (candidate, reference) pair.

use std::sync::Arc;
use taleweave_core::{MetricBundle, ScoreTriple, SemanticScorer};
use tracing::warn;

use crate::rouge::{rouge_l, rouge_n, tokenize};

/// Decimal places kept in every reported score.
pub const SCORE_PRECISION: i32 = 4;

pub struct MetricEngine {
    semantic: Arc<dyn SemanticScorer>,
}

impl MetricEngine {
    pub fn new(semantic: Arc<dyn SemanticScorer>) -> Self {
        Self { semantic }
    }

    /// ROUGE-1/2/L and the semantic triple, rounded. A failing semantic
    /// scorer yields a zero triple; the lexical scores are unaffected.
    pub async fn score(&self, candidate: &str, reference: &str) -> MetricBundle {
        let cand = tokenize(candidate);
        let refs = tokenize(reference);

        let semantic = match self.semantic.score(candidate, reference).await {
            Ok(triple) => triple,
            Err(e) => {
                warn!(scorer = self.semantic.name(), error = %e, "Semantic scoring failed; using zeros");
                ScoreTriple::zero()
            }
        };

        MetricBundle {
            rouge1: rouge_n(&cand, &refs, 1).rounded(SCORE_PRECISION),
            rouge2: rouge_n(&cand, &refs, 2).rounded(SCORE_PRECISION),
            rouge_l: rouge_l(&cand, &refs).rounded(SCORE_PRECISION),
            semantic: semantic.rounded(SCORE_PRECISION),
        }
    }
}
