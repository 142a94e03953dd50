//! Text completion service used for transcript rewriting and tagging.
//!
//! [`CompletionService`] is the seam between the pipeline and the external
//! text-generation provider. The production implementation talks to an
//! OpenAI-compatible chat completions endpoint; tests substitute fakes.

mod chat;

pub use chat::ChatCompletionsClient;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// One bounded request to the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Full prompt, sent as a single user message.
    pub prompt: String,
    /// Output budget in tokens.
    pub max_tokens: u32,
    pub temperature: f32,
    /// Literal markers that end generation early.
    pub stop: Vec<String>,
    /// Exceeding this counts as a failed call.
    pub timeout: Duration,
}

/// Trait for completion providers.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send one request and return the completion text.
    ///
    /// Fails on transport errors, timeouts, non-success statuses and replies
    /// without a completion. Implementations must not retry.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
