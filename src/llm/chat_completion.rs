use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::LlmConfig;
use crate::error::{EditorialError, Result};
use crate::llm::{ChatMessage, LanguageModel};

// Provider prefixes used in model ids that the wire API does not expect.
const PROVIDER_PREFIXES: [&str; 2] = ["groq/", "openai/"];

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint (Groq by default).
pub struct ChatCompletionClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl ChatCompletionClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| EditorialError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Model id as sent on the wire, without a provider prefix.
    pub fn wire_model(&self) -> &str {
        PROVIDER_PREFIXES
            .iter()
            .find_map(|prefix| self.model.strip_prefix(prefix))
            .unwrap_or(&self.model)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn extract_content(model: &str, body: &str) -> Result<String> {
        let response: ChatCompletionResponse = serde_json::from_str(body)?;

        let content = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| EditorialError::MalformedResponse(format!("{} returned no choices", model)))?
            .message
            .content
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(EditorialError::MalformedResponse(format!(
                "{} returned an empty message",
                model
            )));
        }
        Ok(content)
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionClient {
    fn model_name(&self) -> String {
        self.model.clone()
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(EditorialError::CredentialError("GROQ_API_KEY is not set".to_string()));
        }

        let request = ChatCompletionRequest {
            model: self.wire_model(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            "Sending {} messages to {} ({})",
            messages.len(),
            self.endpoint(),
            request.model
        );
        let start_time = Instant::now();

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match status {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(EditorialError::CredentialError(format!(
                    "model service rejected the API key ({})",
                    status
                )));
            }
            _ => {
                return Err(EditorialError::NetworkError(format!(
                    "model service returned {}: {}",
                    status, body
                )));
            }
        }

        let content = Self::extract_content(&self.model, &body)?;
        info!(
            "Completion from {} received in {:?} ({} chars)",
            self.model,
            start_time.elapsed(),
            content.len()
        );
        Ok(content)
    }
}
