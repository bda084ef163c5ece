//! Builds the model adapters from configuration.
//!
//! Every stage talks to the same OpenAI-compatible endpoint; only the model
//! identifier differs per stage.

use std::sync::Arc;
use std::time::Duration;
use taleweave_config::AppConfig;
use taleweave_core::{Adapters, Embedder, Error};
use tracing::info;

use crate::embedder::EndpointEmbedder;
use crate::openai_compat::OpenAiCompatClient;
use crate::summarizer::ChatSummarizer;
use crate::synthesizer::DiffusionSynthesizer;
use crate::tokenizer::build_tokenizer;
use crate::translator::ChatTranslator;

/// Build the shared endpoint client.
pub fn build_client(config: &AppConfig) -> Result<Arc<OpenAiCompatClient>, Error> {
    let timeout = config.provider.request_timeout_secs.map(Duration::from_secs);
    let client = OpenAiCompatClient::new(
        "endpoint",
        &config.provider.api_url,
        config.provider.api_key.clone().unwrap_or_default(),
        timeout,
    )
    .map_err(|e| Error::Config {
        message: format!("model endpoint client: {e}"),
    })?;
    Ok(Arc::new(client))
}

/// Build the summarizer, translator, synthesizer and prompt tokenizer.
pub fn build_adapters(config: &AppConfig) -> Result<Adapters, Error> {
    let client = build_client(config)?;
    let tokenizer = build_tokenizer(&config.pipeline.tokenizer)?;

    info!(
        endpoint = %client.base_url(),
        summary_model = %config.models.summary_model,
        translation_model = %config.models.translation_model,
        image_model = %config.models.image_model,
        tokenizer = %tokenizer.name(),
        "Adapters ready"
    );

    Ok(Adapters {
        summarizer: Arc::new(ChatSummarizer::new(
            client.clone(),
            &config.models.summary_model,
            &config.pipeline.source_language,
        )),
        translator: Arc::new(ChatTranslator::new(
            client.clone(),
            &config.models.translation_model,
            &config.pipeline.source_language,
            &config.pipeline.target_language,
        )),
        synthesizer: Arc::new(DiffusionSynthesizer::new(client, &config.models.image_model)),
        tokenizer,
    })
}

/// Build the embedder used by semantic scoring.
pub fn build_embedder(config: &AppConfig) -> Result<Arc<dyn Embedder>, Error> {
    let client = build_client(config)?;
    Ok(Arc::new(EndpointEmbedder::new(
        client,
        &config.models.embedding_model,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_from_default_config() {
        let config = AppConfig::default();
        let adapters = build_adapters(&config).unwrap();
        assert_eq!(adapters.summarizer.name(), "gpt-4");
        assert_eq!(adapters.translator.name(), "Helsinki-NLP/opus-mt-tr-en");
        assert_eq!(adapters.synthesizer.name(), "runwayml/stable-diffusion-v1-5");
        assert_eq!(adapters.tokenizer.name(), "word");
    }

    #[test]
    fn embedder_uses_embedding_model() {
        let config = AppConfig::default();
        assert_eq!(build_embedder(&config).unwrap().name(), "xlm-roberta-base");
    }

    #[test]
    fn unknown_tokenizer_is_an_error() {
        let mut config = AppConfig::default();
        config.pipeline.tokenizer = "bpe".into();
        assert!(matches!(build_adapters(&config), Err(Error::Tokenizer(_))));
    }
}
