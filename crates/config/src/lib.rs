//! Configuration loading, validation, and management for Taleweave.
//!
//! Loads configuration from `./taleweave.toml` or `~/.taleweave/config.toml`
//! with environment variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taleweave_core::InputLimits;

/// The root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model endpoint settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Model identifiers for every stage
    #[serde(default)]
    pub models: ModelsConfig,

    /// Input limits and prompt construction
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Row store and artifact folders
    #[serde(default)]
    pub storage: StorageConfig,

    /// Evaluation corpora and report output
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Client-side request timeout. Unset means model calls may block
    /// indefinitely; callers wrap runs in their own deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            request_timeout_secs: None,
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_summary_model")]
    pub summary_model: String,

    #[serde(default = "default_translation_model")]
    pub translation_model: String,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Cross-lingual encoder used for semantic scoring
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

fn default_summary_model() -> String {
    "gpt-4".into()
}
fn default_translation_model() -> String {
    "Helsinki-NLP/opus-mt-tr-en".into()
}
fn default_image_model() -> String {
    "runwayml/stable-diffusion-v1-5".into()
}
fn default_embedding_model() -> String {
    "xlm-roberta-base".into()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            summary_model: default_summary_model(),
            translation_model: default_translation_model(),
            image_model: default_image_model(),
            embedding_model: default_embedding_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Constant text placed before every caption in an image prompt
    #[serde(default = "default_prompt_preamble")]
    pub prompt_preamble: String,

    /// The synthesizer's fixed token ceiling
    #[serde(default = "default_max_prompt_tokens")]
    pub max_prompt_tokens: usize,

    /// Tokens reserved for the implicit start/end markers
    #[serde(default = "default_reserved_tokens")]
    pub reserved_tokens: usize,

    #[serde(default = "default_source_language")]
    pub source_language: String,

    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// `"word"` for the built-in tokenizer, or `"hf:<repo-or-path>"`
    #[serde(default = "default_tokenizer")]
    pub tokenizer: String,

    /// Title stored for inline (non-file) documents
    #[serde(default = "default_inline_title")]
    pub inline_title: String,
}

fn default_max_text_chars() -> usize {
    10_000
}
fn default_max_file_bytes() -> u64 {
    16 * 1024 * 1024
}
fn default_prompt_preamble() -> String {
    "A happy watercolor illustration of a children's fairy tale".into()
}
fn default_max_prompt_tokens() -> usize {
    77
}
fn default_reserved_tokens() -> usize {
    2
}
fn default_source_language() -> String {
    "Turkish".into()
}
fn default_target_language() -> String {
    "English".into()
}
fn default_tokenizer() -> String {
    "word".into()
}
fn default_inline_title() -> String {
    "Kullanıcı Metni".into()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_text_chars: default_max_text_chars(),
            max_file_bytes: default_max_file_bytes(),
            prompt_preamble: default_prompt_preamble(),
            max_prompt_tokens: default_max_prompt_tokens(),
            reserved_tokens: default_reserved_tokens(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            tokenizer: default_tokenizer(),
            inline_title: default_inline_title(),
        }
    }
}

impl PipelineConfig {
    pub fn input_limits(&self) -> InputLimits {
        InputLimits {
            max_text_chars: self.max_text_chars,
            max_file_bytes: self.max_file_bytes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Folder for the labelled plain-text digest exports
    #[serde(default = "default_summaries_dir")]
    pub summaries_dir: PathBuf,

    /// Folder the image bytes are written to
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Prefix of the URL-friendly image references stored in rows
    #[serde(default = "default_image_url_prefix")]
    pub image_url_prefix: String,
}

fn default_database_url() -> String {
    "sqlite://summaries.db".into()
}
fn default_summaries_dir() -> PathBuf {
    PathBuf::from("summaries")
}
fn default_images_dir() -> PathBuf {
    PathBuf::from("static").join("images")
}
fn default_image_url_prefix() -> String {
    "images".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            summaries_dir: default_summaries_dir(),
            images_dir: default_images_dir(),
            image_url_prefix: default_image_url_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Digests produced by the pipeline
    #[serde(default = "default_generated_dir")]
    pub generated_dir: PathBuf,

    /// Reference digests written by a large generative model
    #[serde(default = "default_llm_reference_dir")]
    pub llm_reference_dir: PathBuf,

    /// Reference digests built by extractive sentence ranking
    #[serde(default = "default_extractive_reference_dir")]
    pub extractive_reference_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Minimum filename similarity ratio for a reference to count as a match
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,

    /// Only generated files with this extension are evaluated
    #[serde(default = "default_generated_extension")]
    pub generated_extension: String,
}

fn default_generated_dir() -> PathBuf {
    PathBuf::from("summaries")
}
fn default_llm_reference_dir() -> PathBuf {
    PathBuf::from("gpt_summaries")
}
fn default_extractive_reference_dir() -> PathBuf {
    PathBuf::from("cos_sim_summaries")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("metrics")
}
fn default_match_threshold() -> f64 {
    0.4
}
fn default_generated_extension() -> String {
    "txt".into()
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            generated_dir: default_generated_dir(),
            llm_reference_dir: default_llm_reference_dir(),
            extractive_reference_dir: default_extractive_reference_dir(),
            output_dir: default_output_dir(),
            match_threshold: default_match_threshold(),
            generated_extension: default_generated_extension(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the first existing default location.
    ///
    /// Search order: `./taleweave.toml`, then `~/.taleweave/config.toml`.
    /// Environment variables override file values:
    /// - `TALEWEAVE_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `TALEWEAVE_API_URL`
    /// - `TALEWEAVE_SUMMARY_MODEL`, `TALEWEAVE_TRANSLATION_MODEL`, `TALEWEAVE_IMAGE_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_paths()
            .into_iter()
            .find(|p| p.exists())
            .unwrap_or_else(|| Self::config_dir().join("config.toml"));
        Self::load_with_overrides(&path)
    }

    /// Load from `path`, apply environment overrides, then validate.
    pub fn load_with_overrides(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Candidate config file locations, highest priority first.
    pub fn default_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("taleweave.toml"),
            Self::config_dir().join("config.toml"),
        ]
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".taleweave")
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("TALEWEAVE_API_KEY").or_else(|| {
            if self.provider.api_key.is_none() {
                lookup("OPENAI_API_KEY")
            } else {
                None
            }
        }) {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = lookup("TALEWEAVE_API_URL") {
            self.provider.api_url = url;
        }
        if let Some(model) = lookup("TALEWEAVE_SUMMARY_MODEL") {
            self.models.summary_model = model;
        }
        if let Some(model) = lookup("TALEWEAVE_TRANSLATION_MODEL") {
            self.models.translation_model = model;
        }
        if let Some(model) = lookup("TALEWEAVE_IMAGE_MODEL") {
            self.models.image_model = model;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing: Vec<&str> = [
            ("summary_model", &self.models.summary_model),
            ("translation_model", &self.models.translation_model),
            ("image_model", &self.models.image_model),
            ("embedding_model", &self.models.embedding_model),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing.join(", ")));
        }

        if self.pipeline.max_text_chars == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.max_text_chars must be > 0".into(),
            ));
        }

        if self.pipeline.max_prompt_tokens <= self.pipeline.reserved_tokens {
            return Err(ConfigError::ValidationError(
                "pipeline.max_prompt_tokens must exceed pipeline.reserved_tokens".into(),
            ));
        }

        let threshold = self.evaluation.match_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::ValidationError(
                "evaluation.match_threshold must be in (0, 1]".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.provider.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Config is missing required keys: {0}")]
    MissingKeys(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
