//! Embeddings endpoint adapter used by semantic scoring.

use async_trait::async_trait;
use std::sync::Arc;
use taleweave_core::error::ScoringError;
use taleweave_core::Embedder;

use crate::openai_compat::OpenAiCompatClient;

pub struct EndpointEmbedder {
    client: Arc<OpenAiCompatClient>,
    model: String,
}

impl EndpointEmbedder {
    pub fn new(client: Arc<OpenAiCompatClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for EndpointEmbedder {
    fn name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ScoringError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.client.embeddings(&self.model, inputs).await?;
        if vectors.len() != inputs.len() {
            return Err(ScoringError::DimensionMismatch {
                expected: inputs.len(),
                got: vectors.len(),
            });
        }
        Ok(vectors)
    }
}
