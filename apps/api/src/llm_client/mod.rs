//! LLM client: the single point of entry for all generative-provider calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All generation goes through the `GenerativeClient` trait.
//!
//! One attempt per call. Retries belong to the caller, not this layer.
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::errors::{Provider, ProviderError, ProviderErrorKind};

pub mod prompts;

/// Raw text returned by the provider. No schema guarantee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProviderResponse {
    pub text: String,
}

/// Anything that turns a rendered prompt into raw generated text.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<RawProviderResponse, ProviderError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_tokens: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Gemini `generateContent` adapter.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.provider_timeout)
            .build()
            .context("Failed to build HTTP client for the generative provider")?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.gemini_base_url.trim_end_matches('/'),
                config.model_name
            ),
        })
    }

    fn error(kind: ProviderErrorKind, message: impl Into<String>) -> ProviderError {
        ProviderError::new(Provider::Generative, kind, message)
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<RawProviderResponse, ProviderError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(Provider::Generative, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::from_status(
                Provider::Generative,
                status.as_u16(),
                &message,
            ));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                Self::error(ProviderErrorKind::Timeout, e.without_url().to_string())
            } else {
                Self::error(
                    ProviderErrorKind::Transport,
                    format!("malformed response body: {}", e.without_url()),
                )
            }
        })?;

        if let Some(usage) = &body.usage {
            debug!(
                "Generation call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_tokens, usage.output_tokens
            );
        }

        let text = body.text().ok_or_else(|| {
            Self::error(
                ProviderErrorKind::Transport,
                "response contained no candidate text",
            )
        })?;

        Ok(RawProviderResponse { text })
    }
}
