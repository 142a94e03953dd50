//! Per-folder pipeline.
//!
//! Coordinates one work item from extraction to the written page:
//! read the folder, clean the transcript, generate tags, render the page.

use crate::completion::{ChatCompletionsClient, CompletionService};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::render::{PageData, PageWriter};
use crate::rewrite::{RewriteClient, TagGenerator};
use crate::source::{extract, Transcript, WorkItem};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Builds the page for one video folder.
pub struct Orchestrator {
    rewriter: RewriteClient,
    tagger: TagGenerator,
    writer: PageWriter,
}

impl Orchestrator {
    /// Create an orchestrator from settings.
    ///
    /// Without an API key transcripts are kept as-is and default tags are
    /// used; this is logged once here.
    pub fn new(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let service: Option<Arc<dyn CompletionService>> =
            match ChatCompletionsClient::from_settings(&settings.rewrite)? {
                Some(client) => {
                    info!("Using {} for transcript cleanup and tags", client.model());
                    Some(Arc::new(client))
                }
                None => {
                    warn!(
                        "{} not set; transcripts will not be cleaned and default tags will be used",
                        settings.rewrite.api_key_env
                    );
                    None
                }
            };

        Self::with_service(settings, prompts, service)
    }

    /// Create an orchestrator with a custom completion service.
    pub fn with_service(
        settings: &Settings,
        prompts: Prompts,
        service: Option<Arc<dyn CompletionService>>,
    ) -> Result<Self> {
        let prompts = Arc::new(prompts);

        Ok(Self {
            rewriter: RewriteClient::new(service.clone(), Arc::clone(&prompts), settings.rewrite.clone())?,
            tagger: TagGenerator::new(service, prompts, settings.tags.clone()),
            writer: PageWriter::new(settings.output_dir(), settings.site.clone()),
        })
    }

    /// Whether a completion service is configured.
    pub fn has_service(&self) -> bool {
        self.rewriter.is_enabled()
    }

    /// Process one folder and write its page.
    #[instrument(skip(self), fields(item = %item.name))]
    pub async fn process(&self, item: &WorkItem) -> Result<ProcessResult> {
        let inputs = extract(item).await?;

        let (transcript, tags) = match &inputs.transcript {
            Transcript::Text(raw) => {
                let cleaned = self.rewriter.clean_transcript(raw).await;
                let tags = self.tagger.generate(&cleaned).await;
                (cleaned, tags)
            }
            Transcript::Placeholder(text) => (text.to_string(), self.tagger.default_tags()),
        };

        let page = PageData {
            title: inputs.folder.title.clone(),
            date: inputs.folder.date_label.clone(),
            video_id: inputs.video_id.clone(),
            description_html: inputs.description_html,
            transcript,
            tags,
        };

        let path = self.writer.write(&item.name, &page).await?;

        Ok(ProcessResult {
            video_id: inputs.video_id,
            title: page.title,
            path,
            tags: page.tags,
        })
    }
}

/// Result of processing one folder.
#[derive(Debug)]
pub struct ProcessResult {
    pub video_id: String,
    pub title: String,
    /// The written page.
    pub path: PathBuf,
    pub tags: Vec<String>,
}
