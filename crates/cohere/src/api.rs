//! Cohere API client.
//!
//! This module implements both capability traits against the Cohere REST
//! API: `POST /v1/embed` for embeddings and `POST /v1/generate` for text
//! generation. API reference: https://docs.cohere.com/reference/about

use lore_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::client::{EmbeddingClient, GenerationClient};

/// Default base URL for the Cohere API.
const COHERE_API_BASE: &str = "https://api.cohere.ai";

/// Maximum number of tokens a generation may produce.
const MAX_TOKENS: u32 = 512;

/// Sampling temperature for generations.
const TEMPERATURE: f32 = 0.5;

/// Request timeout in seconds, applied to every capability call.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Cohere embed API request format.
#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    texts: Vec<String>,
}

/// Cohere embed API response format.
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Cohere generate API request format.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
}

/// Cohere generate API response format.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    text: String,
}

/// Error body returned by the Cohere API.
#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// HTTP client for the Cohere embed and generate endpoints.
///
/// The API key is optional at construction; a missing key makes every
/// capability call fail with that capability's error kind, so a run that
/// never reaches the API never notices.
pub struct CohereClient {
    /// Base URL for the Cohere API
    base_url: String,

    /// Bearer token, from `COHERE_TOKEN`
    api_key: Option<String>,

    /// Model used for `/v1/embed`
    embed_model: String,

    /// Model used for `/v1/generate`
    generate_model: String,

    /// HTTP client
    http: reqwest::Client,
}

impl CohereClient {
    /// Create a new client against the public Cohere API.
    pub fn new(
        api_key: Option<String>,
        embed_model: impl Into<String>,
        generate_model: impl Into<String>,
    ) -> AppResult<Self> {
        Self::with_base_url(COHERE_API_BASE, api_key, embed_model, generate_model)
    }

    /// Create a new client with a custom base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: Option<String>,
        embed_model: impl Into<String>,
        generate_model: impl Into<String>,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            api_key,
            embed_model: embed_model.into(),
            generate_model: generate_model.into(),
            http,
        })
    }

    fn embed_request(&self, text: &str) -> EmbedRequest {
        EmbedRequest {
            model: self.embed_model.clone(),
            texts: vec![text.to_string()],
        }
    }

    fn generate_request(&self, prompt: &str) -> GenerateRequest {
        GenerateRequest {
            model: self.generate_model.clone(),
            prompt: prompt.to_string(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    fn require_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

/// Render a non-success response into an error message, decoding the
/// Cohere error body when possible.
async fn error_body(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    match serde_json::from_str::<ApiError>(&text) {
        Ok(api_error) => format!("Cohere API error ({}): {}", status, api_error.message),
        Err(_) => format!("Cohere API error ({}): {}", status, text),
    }
}

#[async_trait::async_trait]
impl EmbeddingClient for CohereClient {
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let api_key = self
            .require_key()
            .ok_or_else(|| AppError::Embedding("COHERE_TOKEN is not set".to_string()))?;

        tracing::debug!("Sending embed request ({} chars)", text.chars().count());

        let url = format!("{}/v1/embed", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.embed_request(text))
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to reach Cohere: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Embedding(error_body(response).await));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to parse embed response: {}", e)))?;

        body.embeddings
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Embedding("Cohere returned no embedding".to_string()))
    }
}

#[async_trait::async_trait]
impl GenerationClient for CohereClient {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let api_key = self
            .require_key()
            .ok_or_else(|| AppError::Generation("COHERE_TOKEN is not set".to_string()))?;

        tracing::debug!("Sending generate request ({} chars)", prompt.chars().count());

        let url = format!("{}/v1/generate", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.generate_request(prompt))
            .send()
            .await
            .map_err(|e| AppError::Generation(format!("Failed to reach Cohere: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Generation(error_body(response).await));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            AppError::Generation(format!("Failed to parse generate response: {}", e))
        })?;

        let generation = body
            .generations
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Generation("Cohere returned no generations".to_string()))?;

        Ok(generation.text.trim().to_string())
    }
}
