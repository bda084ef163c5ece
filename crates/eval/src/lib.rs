//! Evaluation of generated digests against two reference corpora.
//!
//! - [`matcher`] pairs a generated file with a reference file by fuzzy name
//! - [`rouge`] and [`semantic`] score one (candidate, reference) text pair
//! - [`metrics`] bundles those scores, rounded for the report
//! - [`harness`] walks the generated corpus and builds the [`report::Report`]

pub mod harness;
pub mod matcher;
pub mod metrics;
pub mod report;
pub mod rouge;
pub mod semantic;

pub use harness::{EvaluationHarness, ReferenceCorpus};
pub use matcher::{similarity_ratio, CorpusMatcher};
pub use metrics::MetricEngine;
pub use report::{Report, SourceSummary};
pub use semantic::{cosine_similarity, GreedyAlignmentScorer};
