//! `taleweave evaluate`: score generated digests against the reference corpora.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use taleweave_config::EvaluationConfig;
use taleweave_eval::{CorpusMatcher, EvaluationHarness, GreedyAlignmentScorer, MetricEngine, Report};
use taleweave_providers::build_embedder;

use super::{load_config, CommandResult};

/// Command-line values that replace the `[evaluation]` section.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub generated: Option<PathBuf>,
    pub llm_references: Option<PathBuf>,
    pub extractive_references: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub threshold: Option<f64>,
}

impl Overrides {
    pub fn apply(self, mut evaluation: EvaluationConfig) -> Result<EvaluationConfig, String> {
        if let Some(dir) = self.generated {
            evaluation.generated_dir = dir;
        }
        if let Some(dir) = self.llm_references {
            evaluation.llm_reference_dir = dir;
        }
        if let Some(dir) = self.extractive_references {
            evaluation.extractive_reference_dir = dir;
        }
        if let Some(dir) = self.output {
            evaluation.output_dir = dir;
        }
        if let Some(threshold) = self.threshold {
            if !(threshold > 0.0 && threshold <= 1.0) {
                return Err(format!("--threshold must be in (0, 1], got {threshold}"));
            }
            evaluation.match_threshold = threshold;
        }
        Ok(evaluation)
    }
}

pub fn print_summary(report: &Report) {
    let summaries = report.summaries();
    if summaries.is_empty() {
        println!("  No generated digest matched a reference.");
        return;
    }
    println!(
        "  {:<10} {:>7} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "Reference", "Files", "ROUGE-1", "ROUGE-2", "ROUGE-L", "Semantic", "Overall"
    );
    for s in summaries {
        println!(
            "  {:<10} {:>7} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4}",
            s.reference_source.label(),
            s.records,
            s.rouge1_f1,
            s.rouge2_f1,
            s.rouge_l_f1,
            s.semantic_f1,
            s.overall
        );
    }
}

pub async fn run(config_path: Option<&Path>, overrides: Overrides) -> CommandResult {
    let config = load_config(config_path)?;
    let evaluation = overrides.apply(config.evaluation.clone())?;

    let scorer = GreedyAlignmentScorer::new(build_embedder(&config)?);
    let harness = EvaluationHarness::new(
        CorpusMatcher::new(evaluation.match_threshold),
        MetricEngine::new(Arc::new(scorer)),
        evaluation.generated_extension.clone(),
    );

    println!("📊 Evaluating {}\n", evaluation.generated_dir.display());
    let report = harness
        .evaluate(
            &evaluation.generated_dir,
            &evaluation.llm_reference_dir,
            &evaluation.extractive_reference_dir,
        )
        .await?;

    print_summary(&report);
    if !report.unmatched.is_empty() {
        println!("\n  ⚠️  {} file/reference pair(s) had no match", report.unmatched.len());
    }

    let (csv, json) = report.write_to(&evaluation.output_dir).await?;
    println!("\n  📄 {}", csv.display());
    println!("  📄 {}", json.display());
    Ok(())
}
