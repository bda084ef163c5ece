//! The Taleweave digest pipeline.
//!
//! Takes a validated document through summarization, per-section translation
//! and token-budgeted image synthesis, then persists the result. Every stage
//! after summarization degrades to a fallback value instead of failing the run.

pub mod naming;
pub mod orchestrator;
pub mod outcome;
pub mod persister;
pub mod text;
pub mod token_budget;

pub use naming::{artifact_name, export_name, format_timestamp, sanitize_model_id};
pub use orchestrator::{DigestArtifacts, Pipeline, StageNote};
pub use outcome::StageOutcome;
pub use persister::{PersistedDigest, ResultPersister};
pub use text::clean_text;
pub use token_budget::{Prompt, TokenBudget};

#[cfg(test)]
pub(crate) mod testing;
