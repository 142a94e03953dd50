//! Transcript cleanup through the completion service.

use crate::chunking::{combine, normalize, Chunker};
use crate::completion::{CompletionRequest, CompletionService};
use crate::config::{Prompts, RewriteSettings};
use crate::error::{ReelpageError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Where a piece of text sits within a chunked document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionHint {
    /// Zero-based chunk index.
    pub index: usize,
    pub total: usize,
}

impl PositionHint {
    /// A document sent as one piece.
    pub const WHOLE: PositionHint = PositionHint { index: 0, total: 1 };

    fn is_chunk(&self) -> bool {
        self.total > 1
    }
}

/// Smallest accepted context-window headroom, in tokens.
pub const MIN_RESERVE_TOKENS: i64 = 1_000;

/// Check that the budget settings leave headroom and a usable fallback.
pub fn validate_budget(settings: &RewriteSettings) -> Result<()> {
    if settings.reserve_tokens < MIN_RESERVE_TOKENS {
        return Err(ReelpageError::Config(format!(
            "reserve tokens ({}) must be at least {}",
            settings.reserve_tokens, MIN_RESERVE_TOKENS
        )));
    }
    if settings.fallback_max_tokens <= 0 {
        return Err(ReelpageError::Config(format!(
            "fallback max tokens ({}) must be greater than zero",
            settings.fallback_max_tokens
        )));
    }
    if settings.context_window_tokens <= settings.reserve_tokens {
        return Err(ReelpageError::Config(format!(
            "context window ({}) must be larger than the reserve ({})",
            settings.context_window_tokens, settings.reserve_tokens
        )));
    }
    Ok(())
}

/// Output token budget for a prompt of `prompt_chars` characters.
///
/// The prompt size is estimated from a fixed chars-per-token ratio. Larger
/// prompts get a smaller tiered cap, the cap is limited by what the context
/// window leaves after the prompt and reserve, and a non-positive result
/// falls back to `fallback_max_tokens`.
pub fn output_budget(prompt_chars: usize, settings: &RewriteSettings) -> u32 {
    let estimated = (prompt_chars / settings.chars_per_token.max(1)) as i64;

    let tier: i64 = match estimated {
        e if e > 40_000 => 8_000,
        e if e > 30_000 => 12_000,
        e if e > 20_000 => 15_000,
        _ => 20_000,
    };

    let available = settings.context_window_tokens - estimated - settings.reserve_tokens;
    let budget = tier.min(available);

    if budget <= 0 {
        warn!(
            "Prompt of ~{} tokens leaves no room in the context window, using {} max tokens",
            estimated, settings.fallback_max_tokens
        );
        return settings.fallback_max_tokens.clamp(1, u32::MAX as i64) as u32;
    }

    budget.min(u32::MAX as i64) as u32
}

/// Cleans transcripts, chunking the ones that exceed the segment limit.
pub struct RewriteClient {
    service: Option<Arc<dyn CompletionService>>,
    prompts: Arc<Prompts>,
    settings: RewriteSettings,
    chunker: Chunker,
}

impl RewriteClient {
    /// Create a client. Without a service every rewrite returns its input.
    pub fn new(
        service: Option<Arc<dyn CompletionService>>,
        prompts: Arc<Prompts>,
        settings: RewriteSettings,
    ) -> Result<Self> {
        let chunker = Chunker::from_settings(&settings)?;
        validate_budget(&settings)?;
        Ok(Self {
            service,
            prompts,
            settings,
            chunker,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.service.is_some()
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Build the cleanup prompt for one piece of text.
    pub fn build_prompt(&self, text: &str, hint: PositionHint) -> String {
        let cleanup = &self.prompts.cleanup;

        let chunk_note = if hint.is_chunk() {
            let mut note_vars = HashMap::new();
            note_vars.insert("index".to_string(), (hint.index + 1).to_string());
            note_vars.insert("total".to_string(), hint.total.to_string());
            Prompts::render(&cleanup.chunk_note, &note_vars)
        } else {
            String::new()
        };

        let mut vars = HashMap::new();
        vars.insert("substitutions".to_string(), cleanup.substitution_lines());
        vars.insert("chunk_note".to_string(), chunk_note);
        // Last, so a literal placeholder inside the transcript is left alone
        let template = self.prompts.render_with_custom(&cleanup.user, &vars);

        let mut transcript = HashMap::new();
        transcript.insert("transcript".to_string(), text.to_string());
        Prompts::render(&template, &transcript)
    }

    /// Rewrite one piece of text.
    ///
    /// Never fails: on any service error, timeout or empty reply the original
    /// text is returned and a warning is logged.
    pub async fn rewrite(&self, text: &str, hint: PositionHint) -> String {
        match self.service.as_deref() {
            Some(service) => self.rewrite_with(service, text, hint).await,
            None => text.to_string(),
        }
    }

    async fn rewrite_with(&self, service: &dyn CompletionService, text: &str, hint: PositionHint) -> String {
        let prompt = self.build_prompt(text, hint);
        let prompt_chars = prompt.chars().count();
        let max_tokens = output_budget(prompt_chars, &self.settings);

        if hint.is_chunk() {
            debug!(
                "Chunk {}/{}: ~{} input tokens, {} max output tokens",
                hint.index + 1,
                hint.total,
                prompt_chars / self.settings.chars_per_token.max(1),
                max_tokens
            );
        }

        let request = CompletionRequest {
            prompt,
            max_tokens,
            temperature: self.settings.temperature,
            stop: self.settings.stop.clone(),
            timeout: Duration::from_secs(self.settings.timeout_secs),
        };

        match service.complete(&request).await {
            Ok(reply) => {
                let cleaned = reply.trim();
                if cleaned.is_empty() {
                    warn!("Rewrite returned no text, keeping original");
                    text.to_string()
                } else {
                    cleaned.to_string()
                }
            }
            Err(e) => {
                warn!("Rewrite failed, keeping original text: {}", e);
                text.to_string()
            }
        }
    }

    /// Clean a whole transcript.
    ///
    /// A transcript within the segment limit is rewritten in one request.
    /// Longer ones are split, rewritten segment by segment in order,
    /// reassembled, and given a final pass when the result fits in one
    /// request. Without a service the transcript is returned unchanged.
    #[instrument(skip(self, transcript), fields(len = transcript.len()))]
    pub async fn clean_transcript(&self, transcript: &str) -> String {
        let Some(service) = self.service.as_deref() else {
            debug!("No completion service, keeping transcript as-is");
            return transcript.to_string();
        };

        if self.chunker.fits(transcript) {
            let cleaned = self.rewrite_with(service, transcript, PositionHint::WHOLE).await;
            return normalize(&cleaned);
        }

        let segments: Vec<_> = self.chunker.split(transcript).collect();
        let total = segments.len();
        info!(
            "Transcript too long ({} chars), processing in {} chunks",
            transcript.chars().count(),
            total
        );

        let mut rewritten = Vec::with_capacity(total);
        for (index, segment) in segments.iter().enumerate() {
            info!(
                "Processing chunk {}/{} ({} chars)",
                index + 1,
                total,
                segment.text.chars().count()
            );
            let text = self
                .rewrite_with(service, segment.text, PositionHint { index, total })
                .await;
            rewritten.push(segment.transformed(text));
        }

        let combined = combine(rewritten);

        if self.settings.final_pass && self.chunker.fits(&combined) {
            info!("Performing final cleanup pass ({} chars)", combined.chars().count());
            let polished = self.rewrite_with(service, &combined, PositionHint::WHOLE).await;
            return normalize(&polished);
        }

        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::sample_document;
    use crate::config::CleanupPrompts;
    use crate::error::ReelpageError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns the prompt unchanged.
    struct EchoService;

    #[async_trait]
    impl CompletionService for EchoService {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            Ok(request.prompt.clone())
        }
    }

    struct FailingService;

    #[async_trait]
    impl CompletionService for FailingService {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            Err(ReelpageError::Completion("service unavailable".to_string()))
        }
    }

    /// Records every request and answers with a fixed reply.
    struct RecordingService {
        reply: String,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl RecordingService {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionService for RecordingService {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    /// Prompts whose rendered text is exactly the transcript.
    fn bare_prompts() -> Arc<Prompts> {
        Arc::new(Prompts {
            cleanup: CleanupPrompts {
                user: "{{transcript}}".to_string(),
                chunk_note: String::new(),
                substitutions: Vec::new(),
            },
            ..Prompts::default()
        })
    }

    fn client(service: Option<Arc<dyn CompletionService>>, prompts: Arc<Prompts>) -> RewriteClient {
        RewriteClient::new(service, prompts, RewriteSettings::default()).unwrap()
    }

    #[test]
    fn test_output_budget_tiers() {
        let settings = RewriteSettings::default();
        assert_eq!(output_budget(3_000, &settings), 20_000);
        assert_eq!(output_budget(3 * 25_000, &settings), 15_000);
        assert_eq!(output_budget(3 * 35_000, &settings), 12_000);
        assert_eq!(output_budget(3 * 45_000, &settings), 8_000);
        // Limited by the context window: 65537 - 60000 - 1000
        assert_eq!(output_budget(3 * 60_000, &settings), 4_537);
        // Nothing left: fallback
        assert_eq!(output_budget(3 * 65_000, &settings), 5_000);
    }

    #[test]
    fn test_prompt_mentions_chunk_position() {
        let client = client(None, Arc::new(Prompts::default()));

        let whole = client.build_prompt("Some text.", PositionHint::WHOLE);
        assert!(whole.contains("Some text."));
        assert!(whole.contains("Replace \"Quen\" with \"Qwen\""));
        assert!(!whole.contains("Note: This is chunk"));
        assert!(!whole.contains("{{"));

        let chunk = client.build_prompt("Some text.", PositionHint { index: 1, total: 3 });
        assert!(chunk.contains("Note: This is chunk 2 of 3."));
    }

    #[test]
    fn test_placeholder_in_transcript_is_not_expanded() {
        let client = client(None, Arc::new(Prompts::default()));
        let prompt = client.build_prompt("he said {{chunk_note}} loudly", PositionHint::WHOLE);
        assert!(prompt.contains("he said {{chunk_note}} loudly"));
    }

    #[tokio::test]
    async fn test_rewrite_failure_returns_original() {
        let client = client(Some(Arc::new(FailingService)), bare_prompts());
        let text = "Um, so this is, uh, the original.";
        assert_eq!(client.rewrite(text, PositionHint::WHOLE).await, text);
    }

    #[tokio::test]
    async fn test_empty_reply_returns_original() {
        let client = client(Some(Arc::new(RecordingService::new("  \n "))), bare_prompts());
        assert_eq!(client.rewrite("Keep me.", PositionHint::WHOLE).await, "Keep me.");
    }

    #[tokio::test]
    async fn test_reply_is_trimmed() {
        let client = client(Some(Arc::new(RecordingService::new("\n Clean text. \n"))), bare_prompts());
        assert_eq!(client.rewrite("Dirty text.", PositionHint::WHOLE).await, "Clean text.");
    }

    #[tokio::test]
    async fn test_without_service_transcript_is_untouched() {
        let client = client(None, bare_prompts());
        assert!(!client.is_enabled());

        let transcript = "line one\n\n\n\nline two ";
        assert_eq!(client.clean_transcript(transcript).await, transcript);
    }

    #[tokio::test]
    async fn test_short_transcript_is_one_request() {
        let service = Arc::new(RecordingService::new("First.\nSecond."));
        let client = client(Some(service.clone()), Arc::new(Prompts::default()));

        let cleaned = client.clean_transcript("first second").await;
        assert_eq!(cleaned, "First.\n\nSecond.\n\n");

        let requests = service.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, 20_000);
        assert_eq!(requests[0].stop.len(), 6);
        assert!((requests[0].temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(requests[0].timeout, Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_identity_service_preserves_long_transcript() {
        let mut document = sample_document(70_000);
        document.truncate(70_000);

        let client = client(Some(Arc::new(EchoService)), bare_prompts());
        let cleaned = client.clean_transcript(&document).await;

        let expected: Vec<_> = document.split_whitespace().collect();
        let actual: Vec<_> = cleaned.split_whitespace().collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_failing_service_preserves_long_transcript() {
        let document = sample_document(50_000);

        let client = client(Some(Arc::new(FailingService)), bare_prompts());
        let cleaned = client.clean_transcript(&document).await;

        let expected: Vec<_> = document.split_whitespace().collect();
        let actual: Vec<_> = cleaned.split_whitespace().collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_long_transcript_chunks_then_final_pass() {
        let service = Arc::new(RecordingService::new("Short summary sentence."));
        let client = client(Some(service.clone()), Arc::new(Prompts::default()));

        let document = sample_document(40_000);
        let cleaned = client.clean_transcript(&document).await;
        assert_eq!(cleaned, "Short summary sentence.\n\n");

        let requests = service.requests();
        // Two chunks, then one pass over the (now short) reassembled text
        assert_eq!(requests.len(), 3);
        assert!(requests[0].prompt.contains("Note: This is chunk 1 of 2."));
        assert!(requests[1].prompt.contains("Note: This is chunk 2 of 2."));
        assert!(!requests[2].prompt.contains("Note: This is chunk"));
    }

    #[tokio::test]
    async fn test_final_pass_can_be_disabled() {
        let service = Arc::new(RecordingService::new("Short summary sentence."));
        let settings = RewriteSettings {
            final_pass: false,
            ..RewriteSettings::default()
        };
        let client = RewriteClient::new(Some(service.clone()), Arc::new(Prompts::default()), settings).unwrap();

        client.clean_transcript(&sample_document(40_000)).await;
        assert_eq!(service.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_multibyte_transcript_within_char_limit_is_one_request() {
        let service = Arc::new(RecordingService::new("Très bien."));
        let client = client(Some(service.clone()), Arc::new(Prompts::default()));

        // 30k chars but 60k bytes
        let transcript = "é".repeat(30_000);
        client.clean_transcript(&transcript).await;

        let requests = service.requests();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].prompt.contains("Note: This is chunk"));
    }

    #[test]
    fn test_budget_without_headroom_is_rejected() {
        for (reserve, fallback) in [(0, 5_000), (-1_000, 5_000), (999, 5_000), (1_000, 0), (1_000, -1)] {
            let settings = RewriteSettings {
                reserve_tokens: reserve,
                fallback_max_tokens: fallback,
                ..RewriteSettings::default()
            };
            let result = RewriteClient::new(None, Arc::new(Prompts::default()), settings);
            assert!(
                matches!(result, Err(ReelpageError::Config(_))),
                "reserve={reserve} fallback={fallback}"
            );
        }

        let settings = RewriteSettings {
            reserve_tokens: MIN_RESERVE_TOKENS,
            ..RewriteSettings::default()
        };
        assert!(validate_budget(&settings).is_ok());
    }

    #[test]
    fn test_invalid_chunk_settings_are_rejected() {
        let settings = RewriteSettings {
            max_segment_chars: 1_000,
            overlap_chars: 1_000,
            ..RewriteSettings::default()
        };
        assert!(RewriteClient::new(None, Arc::new(Prompts::default()), settings).is_err());
    }
}
