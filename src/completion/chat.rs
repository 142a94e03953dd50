//! OpenAI-compatible chat completions client.

use super::{CompletionRequest, CompletionService};
use crate::config::RewriteSettings;
use crate::error::{ReelpageError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Connection timeout; the overall timeout is set per request.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Chat completions client (Together, OpenAI and compatible APIs).
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsClient {
    /// Create a client for the given endpoint, key and model.
    pub fn new(api_url: &str, api_key: &str, model: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Create a client from settings, or `None` when no API key is configured.
    pub fn from_settings(settings: &RewriteSettings) -> Result<Option<Self>> {
        match settings.api_key() {
            Some(key) => Ok(Some(Self::new(&settings.api_url, &key, &settings.model)?)),
            None => Ok(None),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
    stop: &'a [String],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionService for ChatCompletionsClient {
    #[instrument(skip(self, request), fields(prompt_len = request.prompt.len(), max_tokens = request.max_tokens))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stop: &request.stop,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ReelpageError::Completion(format!(
                "API returned {}: {}",
                status,
                &text[..crate::chunking::floor_char_boundary(&text, 500)]
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ReelpageError::Completion("Empty response from completion API".to_string()))?;

        debug!("Completion returned {} chars", content.len());
        Ok(content)
    }
}
