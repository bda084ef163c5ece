//! The evaluation report: one flat record per scored pair, with CSV and JSON
//! export and per-source means.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taleweave_core::error::PersistenceError;
use taleweave_core::{EvaluationRecord, ReferenceSource};
use tracing::info;

use crate::metrics::SCORE_PRECISION;

/// File stem of the exported report.
pub const REPORT_STEM: &str = "model_performance";

const CSV_HEADER: [&str; 15] = [
    "File",
    "Reference",
    "Reference File",
    "ROUGE-1 Precision",
    "ROUGE-1 Recall",
    "ROUGE-1 F1",
    "ROUGE-2 Precision",
    "ROUGE-2 Recall",
    "ROUGE-2 F1",
    "ROUGE-L Precision",
    "ROUGE-L Recall",
    "ROUGE-L F1",
    "Semantic Precision",
    "Semantic Recall",
    "Semantic F1",
];

/// A generated file that had no acceptable match in one reference corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unmatched {
    pub file_name: String,
    pub reference_source: ReferenceSource,
}

/// Mean F1 scores over every record of one reference source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub reference_source: ReferenceSource,
    pub records: usize,
    pub rouge1_f1: f64,
    pub rouge2_f1: f64,
    pub rouge_l_f1: f64,
    pub semantic_f1: f64,
    /// Mean over records of each record's four-F1 mean.
    pub overall: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    pub records: Vec<EvaluationRecord>,
    pub unmatched: Vec<Unmatched>,
}

fn round(value: f64) -> f64 {
    let factor = 10f64.powi(SCORE_PRECISION);
    (value * factor).round() / factor
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records_for(&self, source: ReferenceSource) -> impl Iterator<Item = &EvaluationRecord> {
        self.records.iter().filter(move |r| r.reference_source == source)
    }

    /// Per-source means, in source order; sources without records are left out.
    pub fn summaries(&self) -> Vec<SourceSummary> {
        ReferenceSource::ALL
            .into_iter()
            .filter_map(|source| {
                let records: Vec<&EvaluationRecord> = self.records_for(source).collect();
                if records.is_empty() {
                    return None;
                }
                let n = records.len() as f64;
                let mean = |f: fn(&EvaluationRecord) -> f64| round(records.iter().map(|r| f(r)).sum::<f64>() / n);
                Some(SourceSummary {
                    reference_source: source,
                    records: records.len(),
                    rouge1_f1: mean(|r| r.metrics.rouge1.f1),
                    rouge2_f1: mean(|r| r.metrics.rouge2.f1),
                    rouge_l_f1: mean(|r| r.metrics.rouge_l.f1),
                    semantic_f1: mean(|r| r.metrics.semantic.f1),
                    overall: mean(|r| r.metrics.overall_f1()),
                })
            })
            .collect()
    }

    pub fn to_csv(&self) -> String {
        let mut out = CSV_HEADER.join(",");
        out.push('\n');
        for record in &self.records {
            let m = &record.metrics;
            let mut fields = vec![
                csv_field(&record.file_name),
                csv_field(record.reference_source.label()),
                csv_field(&record.reference_file),
            ];
            for triple in [m.rouge1, m.rouge2, m.rouge_l, m.semantic] {
                fields.push(format!("{:.4}", triple.precision));
                fields.push(format!("{:.4}", triple.recall));
                fields.push(format!("{:.4}", triple.f1));
            }
            out.push_str(&fields.join(","));
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        #[derive(Serialize)]
        struct Export<'a> {
            records: &'a [EvaluationRecord],
            unmatched: &'a [Unmatched],
            summaries: Vec<SourceSummary>,
        }
        serde_json::to_string_pretty(&Export {
            records: &self.records,
            unmatched: &self.unmatched,
            summaries: self.summaries(),
        })
        .map_err(|e| PersistenceError::Export(format!("report JSON: {e}")))
    }

    /// Write `model_performance.csv` and `model_performance.json` into `dir`.
    pub async fn write_to(&self, dir: &Path) -> Result<(PathBuf, PathBuf), PersistenceError> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            PersistenceError::Export(format!("Failed to create {}: {e}", dir.display()))
        })?;

        let csv_path = dir.join(format!("{REPORT_STEM}.csv"));
        let json_path = dir.join(format!("{REPORT_STEM}.json"));
        for (path, content) in [(&csv_path, self.to_csv()), (&json_path, self.to_json()?)] {
            tokio::fs::write(path, content).await.map_err(|e| {
                PersistenceError::Export(format!("Failed to write {}: {e}", path.display()))
            })?;
        }

        info!(csv = %csv_path.display(), records = self.records.len(), "Report written");
        Ok((csv_path, json_path))
    }
}
