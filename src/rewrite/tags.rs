//! Topical tag generation.

use crate::chunking::char_prefix;
use crate::completion::{CompletionRequest, CompletionService};
use crate::config::{Prompts, TagSettings};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Keep the first `max` non-empty trimmed lines of a reply.
pub fn parse_tags(reply: &str, max: usize) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}

/// Asks the completion service for a handful of topical tags.
pub struct TagGenerator {
    service: Option<Arc<dyn CompletionService>>,
    prompts: Arc<Prompts>,
    settings: TagSettings,
}

impl TagGenerator {
    pub fn new(service: Option<Arc<dyn CompletionService>>, prompts: Arc<Prompts>, settings: TagSettings) -> Self {
        Self {
            service,
            prompts,
            settings,
        }
    }

    /// Tags used whenever generation is unavailable or fails.
    pub fn default_tags(&self) -> Vec<String> {
        self.settings.default_tags.clone()
    }

    /// Generate tags for a transcript.
    ///
    /// A blank transcript yields no tags. Otherwise the default tags are
    /// returned when there is no service, tagging is disabled, the call fails
    /// or the reply contains no tags.
    pub async fn generate(&self, transcript: &str) -> Vec<String> {
        if transcript.trim().is_empty() {
            return Vec::new();
        }

        let service = match self.service.as_deref() {
            Some(service) if self.settings.enabled => service,
            _ => return self.default_tags(),
        };

        let excerpt = char_prefix(transcript, self.settings.max_input_chars);
        if excerpt.len() < transcript.len() {
            info!(
                "Transcript too long for tag generation, using first {} of {} chars",
                self.settings.max_input_chars,
                transcript.chars().count()
            );
        }

        // Custom variables first, so placeholders inside the transcript stay literal
        let template = self.prompts.render_with_custom(&self.prompts.tags.user, &HashMap::new());
        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), excerpt.to_string());
        let prompt = Prompts::render(&template, &vars);

        let request = CompletionRequest {
            prompt,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            stop: self.settings.stop.clone(),
            timeout: Duration::from_secs(self.settings.timeout_secs),
        };

        match service.complete(&request).await {
            Ok(reply) => {
                let tags = parse_tags(&reply, self.settings.max_tags);
                if tags.is_empty() {
                    warn!("Tag generation returned no tags, using defaults");
                    self.default_tags()
                } else {
                    debug!("Generated tags: {:?}", tags);
                    tags
                }
            }
            Err(e) => {
                warn!("Tag generation failed, using defaults: {}", e);
                self.default_tags()
            }
        }
    }
}
