//! Evaluation domain types.

use serde::{Deserialize, Serialize};

use crate::adapter::ScoreTriple;

/// The external method that produced a reference digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    /// Digests written by a large generative model.
    Llm,
    /// Digests assembled by extractive sentence ranking.
    Extractive,
}

impl ReferenceSource {
    pub const ALL: [ReferenceSource; 2] = [ReferenceSource::Llm, ReferenceSource::Extractive];

    /// Label written into the report.
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceSource::Llm => "GPT",
            ReferenceSource::Extractive => "Cosine",
        }
    }
}

impl std::fmt::Display for ReferenceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Every score computed for one (candidate, reference) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricBundle {
    pub rouge1: ScoreTriple,
    pub rouge2: ScoreTriple,
    pub rouge_l: ScoreTriple,
    pub semantic: ScoreTriple,
}

impl MetricBundle {
    /// Mean of the four F1 scores.
    pub fn overall_f1(&self) -> f64 {
        (self.rouge1.f1 + self.rouge2.f1 + self.rouge_l.f1 + self.semantic.f1) / 4.0
    }
}

/// One scored comparison between a generated digest and one reference digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Generated digest file name.
    pub file_name: String,
    pub reference_source: ReferenceSource,
    /// The reference file the matcher selected.
    pub reference_file: String,
    pub metrics: MetricBundle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_report_columns() {
        assert_eq!(ReferenceSource::Llm.label(), "GPT");
        assert_eq!(ReferenceSource::Extractive.to_string(), "Cosine");
    }

    #[test]
    fn overall_is_mean_of_f1s() {
        let t = |f1| ScoreTriple {
            precision: 0.0,
            recall: 0.0,
            f1,
        };
        let bundle = MetricBundle {
            rouge1: t(1.0),
            rouge2: t(0.5),
            rouge_l: t(0.5),
            semantic: t(0.0),
        };
        assert!((bundle.overall_f1() - 0.5).abs() < 1e-12);
    }
}
