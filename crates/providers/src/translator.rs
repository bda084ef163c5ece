//! Chat-model translator for digest sections.

use async_trait::async_trait;
use std::sync::Arc;
use taleweave_core::error::TranslationError;
use taleweave_core::Translator;

use crate::openai_compat::OpenAiCompatClient;

pub struct ChatTranslator {
    client: Arc<OpenAiCompatClient>,
    model: String,
    source_language: String,
    target_language: String,
}

impl ChatTranslator {
    pub fn new(
        client: Arc<OpenAiCompatClient>,
        model: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    fn system_prompt(&self) -> String {
        format!(
            "Translate the user's text from {} to {}. Reply with the translation only.",
            self.source_language, self.target_language
        )
    }
}

#[async_trait]
impl Translator for ChatTranslator {
    fn name(&self) -> &str {
        &self.model
    }

    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let translated = self
            .client
            .chat(&self.model, &self.system_prompt(), text, 0.0)
            .await?;
        if translated.trim().is_empty() {
            return Err(TranslationError::EmptyOutput);
        }
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_names_both_languages() {
        let client = Arc::new(OpenAiCompatClient::new("test", "http://localhost:1", "", None).unwrap());
        let translator = ChatTranslator::new(client, "Helsinki-NLP/opus-mt-tr-en", "Turkish", "English");
        let prompt = translator.system_prompt();
        assert!(prompt.contains("from Turkish to English"));
        assert_eq!(translator.name(), "Helsinki-NLP/opus-mt-tr-en");
    }
}
