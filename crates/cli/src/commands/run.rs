//! `taleweave run`: digest one document end to end.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taleweave_config::AppConfig;
use taleweave_core::{Document, Error, SummaryStore};
use taleweave_pipeline::{format_timestamp, Pipeline, TokenBudget};
use taleweave_providers::build_adapters;
use taleweave_store::LocalArtifactStore;

use super::{history, load_config, open_store, CommandResult};

/// What the user asked to digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Inline { text: String, title: Option<String> },
    File(PathBuf),
}

impl Input {
    pub fn new(
        text: Option<String>,
        file: Option<PathBuf>,
        title: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        match (text, file) {
            (Some(text), None) => Ok(Self::Inline { text, title }),
            (None, Some(path)) => Ok(Self::File(path)),
            (None, None) => Err("provide --text or --file".into()),
            (Some(_), Some(_)) => Err("--text and --file are mutually exclusive".into()),
        }
    }

    /// Inline text is named `user_text_<timestamp>`; files keep their stem.
    pub fn into_document(self, config: &AppConfig) -> Result<Document, Box<dyn std::error::Error>> {
        match self {
            Self::Inline { text, title } => {
                let title = title.unwrap_or_else(|| config.pipeline.inline_title.clone());
                let base_name = format!("user_text_{}", format_timestamp(&Utc::now()));
                Ok(Document::inline(text, title, base_name))
            }
            Self::File(path) => Ok(Document::from_file(&path, &config.pipeline.input_limits())?),
        }
    }
}

/// Wire the configured adapters and local artifact folders around `store`.
pub fn build_pipeline(config: &AppConfig, store: Arc<dyn SummaryStore>) -> Result<Pipeline, Error> {
    let adapters = build_adapters(config)?;
    let artifacts = Arc::new(LocalArtifactStore::new(
        &config.storage.images_dir,
        &config.storage.summaries_dir,
        &config.storage.image_url_prefix,
    ));
    let budget = TokenBudget::new(
        config.pipeline.prompt_preamble.clone(),
        config.pipeline.max_prompt_tokens,
        config.pipeline.reserved_tokens,
    );
    Ok(Pipeline::new(
        adapters,
        store,
        artifacts,
        budget,
        config.pipeline.input_limits(),
    ))
}

pub async fn run(config_path: Option<&Path>, input: Input) -> CommandResult {
    let config = load_config(config_path)?;
    let document = input.into_document(&config)?;

    let store = Arc::new(open_store(&config).await?);
    let pipeline = build_pipeline(&config, store)?;

    println!("🧵 Weaving \"{}\"...\n", document.title);
    let result = pipeline.run(&document).await?;
    let persisted = pipeline.persist(&result).await?;

    history::print_row(&persisted.row);

    println!();
    println!("  🖼️  Images: {}/3", result.image_count());
    for note in &result.notes {
        println!("  ⚠️  {} {} fell back: {}", note.section, note.stage, note.cause);
    }
    match &persisted.export_path {
        Some(path) => println!("  📄 Export: {}", path.display()),
        None => println!("  ⚠️  Export was not written; the row is stored"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_requires_exactly_one_source() {
        assert!(Input::new(None, None, None).is_err());
        assert!(Input::new(Some("x".into()), Some("a.txt".into()), None).is_err());
        assert_eq!(
            Input::new(None, Some("a.txt".into()), None).unwrap(),
            Input::File("a.txt".into())
        );
    }

    #[test]
    fn inline_document_uses_configured_title_and_timestamped_base() {
        let config = AppConfig::default();
        let input = Input::new(Some("Bir varmış bir yokmuş.".into()), None, None).unwrap();
        let document = input.into_document(&config).unwrap();

        assert_eq!(document.title, config.pipeline.inline_title);
        let stamp = document.base_name.strip_prefix("user_text_").unwrap();
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn inline_title_override() {
        let input = Input::new(Some("text".into()), None, Some("Hansel".into())).unwrap();
        let document = input.into_document(&AppConfig::default()).unwrap();
        assert_eq!(document.title, "Hansel");
    }

    #[test]
    fn file_document_uses_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pamuk_prenses.txt");
        std::fs::write(&path, "Bir zamanlar bir prenses varmış.").unwrap();

        let document = Input::File(path).into_document(&AppConfig::default()).unwrap();
        assert_eq!(document.title, "pamuk_prenses");
        assert_eq!(document.base_name, "pamuk_prenses");
    }
}
