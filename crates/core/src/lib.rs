//! # Taleweave Core
//!
//! Domain types, capability traits, and error definitions for the Taleweave
//! digest pipeline and evaluation harness. This crate has **no framework
//! dependencies**; it defines the model every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every external model and every storage backend is a trait here.
//! Implementations live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Deterministic stub implementations in tests
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod document;
pub mod digest;
pub mod adapter;
pub mod store;
pub mod evaluation;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use document::{Document, DocumentSource, InputLimits};
pub use digest::{Caption, Digest, ImageRef, SectionKind, Sections};
pub use adapter::{
    Adapters, Embedder, ImageData, ImageSynthesizer, ScoreTriple, SemanticScorer, Summarizer, Tokenizer,
    Translator,
};
pub use store::{fold_title, ArtifactStore, NewSummary, SummaryRow, SummaryStore};
pub use evaluation::{EvaluationRecord, MetricBundle, ReferenceSource};
