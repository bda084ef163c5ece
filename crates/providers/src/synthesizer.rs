//! Diffusion image synthesizer behind an images-generation endpoint.

use async_trait::async_trait;
use std::sync::Arc;
use taleweave_core::error::SynthesisError;
use taleweave_core::{ImageData, ImageSynthesizer};
use tracing::debug;

use crate::openai_compat::OpenAiCompatClient;

pub struct DiffusionSynthesizer {
    client: Arc<OpenAiCompatClient>,
    model: String,
}

impl DiffusionSynthesizer {
    pub fn new(client: Arc<OpenAiCompatClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ImageSynthesizer for DiffusionSynthesizer {
    fn name(&self) -> &str {
        &self.model
    }

    async fn synthesize(&self, prompt: &str) -> Result<ImageData, SynthesisError> {
        let bytes = self.client.generate_image(&self.model, prompt).await?;
        if bytes.is_empty() {
            return Err(SynthesisError::NoImage);
        }
        debug!(model = %self.model, bytes = bytes.len(), "Image received");
        Ok(ImageData { bytes })
    }
}
