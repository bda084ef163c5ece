//! Model adapters for Taleweave.
//!
//! All adapters implement the capability traits in `taleweave_core::adapter`
//! on top of one OpenAI-compatible HTTP client. The factory wires them from
//! configuration.

pub mod embedder;
pub mod factory;
pub mod openai_compat;
pub mod summarizer;
pub mod synthesizer;
pub mod tokenizer;
pub mod translator;

pub use embedder::EndpointEmbedder;
pub use factory::{build_adapters, build_client, build_embedder};
pub use openai_compat::OpenAiCompatClient;
pub use summarizer::ChatSummarizer;
pub use synthesizer::DiffusionSynthesizer;
#[cfg(feature = "hf-tokenizer")]
pub use tokenizer::HfTokenizer;
pub use tokenizer::{build_tokenizer, WordTokenizer};
pub use translator::ChatTranslator;
