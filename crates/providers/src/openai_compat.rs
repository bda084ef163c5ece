//! OpenAI-compatible HTTP client shared by every model adapter.
//!
//! Works with: OpenAI, OpenRouter, vLLM, Text Generation Inference, LocalAI,
//! and any endpoint exposing the OpenAI wire format.
//!
//! Supports:
//! - Chat completions (summarization, translation)
//! - Image generations with base64 payloads (synthesis)
//! - Embeddings (semantic scoring)

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use std::time::Duration;
use taleweave_core::error::AdapterError;
use tracing::{debug, warn};

/// A client for one OpenAI-compatible endpoint.
///
/// One instance is built at startup and shared (`Arc`) by all adapters that
/// talk to the same endpoint.
pub struct OpenAiCompatClient {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    /// Create a new client. `timeout` of `None` leaves requests unbounded.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, AdapterError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AdapterError::NotConfigured(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create an OpenAI client (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Result<Self, AdapterError> {
        Self::new("openai", "https://api.openai.com/v1", api_key, None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a single-turn chat and return the assistant's text.
    pub async fn chat(
        &self,
        model: &str,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, AdapterError> {
        let body = serde_json::json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "temperature": temperature,
            "stream": false,
        });

        debug!(client = %self.name, model, "Sending chat completion request");
        let response = self.post("chat/completions", &body).await?;
        let parsed: ChatResponse = serde_json::from_str(&response)
            .map_err(|e| AdapterError::InvalidResponse(format!("chat response: {e}")))?;
        parse_chat_content(parsed)
    }

    /// Generate one image and return its decoded bytes.
    pub async fn generate_image(&self, model: &str, prompt: &str) -> Result<Vec<u8>, AdapterError> {
        let body = serde_json::json!({
            "model": model,
            "prompt": prompt,
            "n": 1,
            "response_format": "b64_json",
        });

        debug!(client = %self.name, model, prompt_chars = prompt.len(), "Sending image generation request");
        let response = self.post("images/generations", &body).await?;
        let parsed: ImageResponse = serde_json::from_str(&response)
            .map_err(|e| AdapterError::InvalidResponse(format!("image response: {e}")))?;
        decode_first_image(parsed)
    }

    /// Embed each input; one vector per input, in input order.
    pub async fn embeddings(&self, model: &str, inputs: &[String]) -> Result<Vec<Vec<f32>>, AdapterError> {
        let body = serde_json::json!({
            "model": model,
            "input": inputs,
            "encoding_format": "float",
        });

        debug!(client = %self.name, model, count = inputs.len(), "Sending embedding request");
        let response = self.post("embeddings", &body).await?;
        let parsed: EmbeddingResponse = serde_json::from_str(&response)
            .map_err(|e| AdapterError::InvalidResponse(format!("embedding response: {e}")))?;
        Ok(order_embeddings(parsed))
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<String, AdapterError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        if let Some(err) = classify_status(status, &text) {
            warn!(client = %self.name, status, "Model endpoint returned error");
            return Err(err);
        }
        Ok(text)
    }
}

/// Map a non-success HTTP status to an adapter error.
fn classify_status(status: u16, body: &str) -> Option<AdapterError> {
    match status {
        200..=299 => None,
        429 => Some(AdapterError::RateLimited),
        401 | 403 => Some(AdapterError::Authentication(
            "Invalid API key or insufficient permissions".into(),
        )),
        _ => Some(AdapterError::Api {
            status_code: status,
            message: body.to_string(),
        }),
    }
}

fn parse_chat_content(response: ChatResponse) -> Result<String, AdapterError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AdapterError::InvalidResponse("No content in chat response".into()))
}

fn decode_first_image(response: ImageResponse) -> Result<Vec<u8>, AdapterError> {
    let encoded = response
        .data
        .into_iter()
        .find_map(|d| d.b64_json)
        .ok_or_else(|| AdapterError::InvalidResponse("No b64_json image in response".into()))?;
    BASE64
        .decode(encoded.as_bytes())
        .map_err(|e| AdapterError::InvalidResponse(format!("Invalid base64 image: {e}")))
}

fn order_embeddings(response: EmbeddingResponse) -> Vec<Vec<f32>> {
    let mut data = response.data;
    data.sort_by_key(|d| d.index);
    data.into_iter().map(|d| d.embedding).collect()
}

// --- API types (internal) ---

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}
