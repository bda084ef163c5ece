//! Error types for the Taleweave domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each pipeline stage has its own error kind so the orchestrator can decide,
//! per kind, whether a failure is fatal or absorbed with a fallback value.

use thiserror::Error;

/// The top-level error type for all Taleweave operations.
///
/// Only the fatal kinds normally reach a caller: validation, summarization
/// and row persistence. The recoverable kinds exist here so adapters and
/// tests can name them.
#[derive(Debug, Error)]
pub enum Error {
    // --- Input ---
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // --- Stage errors ---
    #[error("Summarization error: {0}")]
    Summarization(#[from] SummarizationError),

    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    // --- Storage ---
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Stage errors ---

/// Caller input was malformed or oversized. No stage is entered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("document is empty")]
    Empty,

    #[error("document is too long: {chars} characters (maximum {max})")]
    TooLong { chars: usize, max: usize },

    #[error("file is too large: {bytes} bytes (maximum {max})")]
    FileTooLarge { bytes: u64, max: u64 },

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("could not read input: {0}")]
    Unreadable(String),
}

/// Transport-level failure shared by the HTTP-backed adapters.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    #[error("API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Rate limited by model endpoint")]
    RateLimited,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Adapter not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, Clone, Error)]
pub enum SummarizationError {
    #[error("summarizer call failed: {0}")]
    Adapter(#[from] AdapterError),

    #[error("summary is missing the {0} section")]
    MissingSection(String),

    #[error("summarizer returned an empty {0} section")]
    EmptySection(String),
}

#[derive(Debug, Clone, Error)]
pub enum TranslationError {
    #[error("translator call failed: {0}")]
    Adapter(#[from] AdapterError),

    #[error("translator returned empty output")]
    EmptyOutput,
}

#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    #[error("synthesizer call failed: {0}")]
    Adapter(#[from] AdapterError),

    #[error("synthesizer returned no image")]
    NoImage,

    #[error("prompt could not be built: {0}")]
    Prompt(#[from] TokenizerError),

    #[error("image could not be stored: {0}")]
    Store(String),
}

#[derive(Debug, Clone, Error)]
pub enum ScoringError {
    #[error("embedding call failed: {0}")]
    Adapter(#[from] AdapterError),

    #[error("embedder returned {got} vectors for {expected} inputs")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("nothing to score: {0}")]
    EmptyInput(String),
}

#[derive(Debug, Clone, Error)]
pub enum TokenizerError {
    #[error("tokenizer unavailable: {0}")]
    Unavailable(String),

    #[error("tokenization failed: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Summary not found: {0}")]
    NotFound(i64),
}
