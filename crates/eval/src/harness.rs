//! Walks the generated corpus and scores each file against every reference
//! corpus it has a name match in.
//!
//! Files are processed one at a time. A missing match in one corpus does not
//! affect the other corpus.

use std::path::{Path, PathBuf};
use taleweave_core::{EvaluationRecord, ReferenceSource, Result};
use tracing::{info, warn};

use crate::matcher::{list_file_names, CorpusMatcher};
use crate::metrics::MetricEngine;
use crate::report::{Report, Unmatched};

/// A folder of reference digests produced by one method.
#[derive(Debug, Clone)]
pub struct ReferenceCorpus {
    pub source: ReferenceSource,
    pub folder: PathBuf,
}

impl ReferenceCorpus {
    pub fn new(source: ReferenceSource, folder: impl Into<PathBuf>) -> Self {
        Self {
            source,
            folder: folder.into(),
        }
    }
}

pub struct EvaluationHarness {
    matcher: CorpusMatcher,
    engine: MetricEngine,
    /// Only generated files with this extension are evaluated.
    extension: String,
}

impl EvaluationHarness {
    pub fn new(matcher: CorpusMatcher, engine: MetricEngine, extension: impl Into<String>) -> Self {
        Self {
            matcher,
            engine,
            extension: extension.into(),
        }
    }

    /// Evaluate against the generative-model and extractive reference folders.
    pub async fn evaluate(&self, generated: &Path, llm_folder: &Path, extractive_folder: &Path) -> Result<Report> {
        self.evaluate_corpora(
            generated,
            &[
                ReferenceCorpus::new(ReferenceSource::Llm, llm_folder),
                ReferenceCorpus::new(ReferenceSource::Extractive, extractive_folder),
            ],
        )
        .await
    }

    /// Evaluate every generated file against each corpus independently.
    ///
    /// Fails only if the generated folder cannot be listed. Unreadable files
    /// are logged and skipped.
    pub async fn evaluate_corpora(&self, generated: &Path, corpora: &[ReferenceCorpus]) -> Result<Report> {
        let files = list_file_names(generated, Some(&self.extension)).await?;
        let mut candidates = Vec::with_capacity(corpora.len());
        for corpus in corpora {
            let names = list_file_names(&corpus.folder, None).await.unwrap_or_else(|e| {
                warn!(source = %corpus.source, folder = %corpus.folder.display(), error = %e, "Reference folder unreadable");
                Vec::new()
            });
            candidates.push(names);
        }

        let total = files.len();
        info!(folder = %generated.display(), files = total, "Evaluation started");

        let mut report = Report::default();
        for (index, file_name) in files.iter().enumerate() {
            info!(file = %format!("{}/{total}", index + 1), name = %file_name, "Evaluating");

            let candidate = match tokio::fs::read_to_string(generated.join(file_name)).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(name = %file_name, error = %e, "Generated file unreadable; skipped");
                    continue;
                }
            };

            for (corpus, names) in corpora.iter().zip(&candidates) {
                let Some(matched) = self.matcher.best_match(file_name, names) else {
                    info!(name = %file_name, source = %corpus.source, "No matching reference");
                    report.unmatched.push(Unmatched {
                        file_name: file_name.clone(),
                        reference_source: corpus.source,
                    });
                    continue;
                };

                let reference = match tokio::fs::read_to_string(corpus.folder.join(matched)).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(name = %matched, source = %corpus.source, error = %e, "Reference file unreadable; skipped");
                        continue;
                    }
                };

                let metrics = self.engine.score(&candidate, &reference).await;
                report.records.push(EvaluationRecord {
                    file_name: file_name.clone(),
                    reference_source: corpus.source,
                    reference_file: matched.to_string(),
                    metrics,
                });
            }
        }

        info!(
            records = report.records.len(),
            unmatched = report.unmatched.len(),
            "Evaluation complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use taleweave_core::error::ScoringError;
    use taleweave_core::{ScoreTriple, SemanticScorer};

    struct ConstantScorer;

    #[async_trait]
    impl SemanticScorer for ConstantScorer {
        fn name(&self) -> &str {
            "constant"
        }

        async fn score(&self, _c: &str, _r: &str) -> std::result::Result<ScoreTriple, ScoringError> {
            Ok(ScoreTriple::from_precision_recall(0.9, 0.9))
        }
    }

    fn harness() -> EvaluationHarness {
        EvaluationHarness::new(
            CorpusMatcher::new(0.4),
            MetricEngine::new(Arc::new(ConstantScorer)),
            "txt",
        )
    }

    struct Corpus {
        _dir: tempfile::TempDir,
        generated: PathBuf,
        llm: PathBuf,
        extractive: PathBuf,
    }

    fn corpus() -> Corpus {
        let dir = tempfile::tempdir().unwrap();
        let generated = dir.path().join("summaries");
        let llm = dir.path().join("gpt_summaries");
        let extractive = dir.path().join("cos_sim_summaries");
        for d in [&generated, &llm, &extractive] {
            std::fs::create_dir(d).unwrap();
        }
        Corpus {
            _dir: dir,
            generated,
            llm,
            extractive,
        }
    }

    #[tokio::test]
    async fn match_in_one_source_only() {
        let c = corpus();
        std::fs::write(c.generated.join("kirmizi_baslikli_kiz.txt"), "kurt kızı gördü").unwrap();
        std::fs::write(c.llm.join("kirmizi_baslikli_kiz_v2.txt"), "kurt kızı gördü").unwrap();
        std::fs::write(c.extractive.join("pamuk_prenses.txt"), "yedi cüce").unwrap();

        let report = harness().evaluate(&c.generated, &c.llm, &c.extractive).await.unwrap();

        assert_eq!(report.records.len(), 1);
        let record = &report.records[0];
        assert_eq!(record.reference_source, ReferenceSource::Llm);
        assert_eq!(record.reference_file, "kirmizi_baslikli_kiz_v2.txt");
        assert_eq!(record.metrics.rouge1.f1, 1.0);
        assert_eq!(record.metrics.semantic.f1, 0.9);
        assert_eq!(report.records_for(ReferenceSource::Extractive).count(), 0);
        assert_eq!(report.unmatched.len(), 1);
    }

    #[tokio::test]
    async fn both_sources_produce_records() {
        let c = corpus();
        std::fs::write(c.generated.join("hansel.txt"), "cadı evi").unwrap();
        std::fs::write(c.llm.join("hansel.txt"), "cadı evi").unwrap();
        std::fs::write(c.extractive.join("hansel_cos.txt"), "cadı").unwrap();

        let report = harness().evaluate(&c.generated, &c.llm, &c.extractive).await.unwrap();

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].reference_source, ReferenceSource::Llm);
        assert_eq!(report.records[1].reference_source, ReferenceSource::Extractive);
        assert_eq!(report.records[1].metrics.rouge1.precision, 0.5);
    }

    #[tokio::test]
    async fn only_configured_extension_is_evaluated() {
        let c = corpus();
        std::fs::write(c.generated.join("notes.md"), "x").unwrap();
        std::fs::write(c.llm.join("notes.md"), "x").unwrap();

        let report = harness().evaluate(&c.generated, &c.llm, &c.extractive).await.unwrap();
        assert!(report.is_empty());
        assert!(report.unmatched.is_empty());
    }

    #[tokio::test]
    async fn missing_reference_folder_is_not_fatal() {
        let c = corpus();
        std::fs::write(c.generated.join("a.txt"), "x").unwrap();
        std::fs::write(c.llm.join("a.txt"), "x").unwrap();

        let report = harness()
            .evaluate(&c.generated, &c.llm, &c.extractive.join("missing"))
            .await
            .unwrap();
        assert_eq!(report.records.len(), 1);
    }

    #[tokio::test]
    async fn missing_generated_folder_is_an_error() {
        let c = corpus();
        assert!(harness()
            .evaluate(&c.generated.join("missing"), &c.llm, &c.extractive)
            .await
            .is_err());
    }
}
