//! Build command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::render::write_index;
use crate::runner::JobRunner;
use crate::source::{discover, WorkItem};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Options of the build command.
#[derive(Debug, Default)]
pub struct BuildOptions {
    pub input: Option<String>,
    pub output: Option<String>,
    pub limit: Option<usize>,
    pub folder: Option<String>,
    pub workers: Option<usize>,
    pub report: Option<String>,
    pub no_index: bool,
}

/// Run the build command.
pub async fn run_build(options: BuildOptions, mut settings: Settings) -> Result<()> {
    if let Some(input) = options.input {
        settings.general.input_dir = input;
    }
    if let Some(output) = options.output {
        settings.general.output_dir = output;
    }

    let input_dir = settings.input_dir();
    let output_dir = settings.output_dir();
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let orchestrator = Arc::new(Orchestrator::new(&settings)?);
    if !orchestrator.has_service() {
        Output::warning(&format!(
            "{} is not set: transcripts are kept as-is and default tags are used.",
            settings.rewrite.api_key_env
        ));
    }

    let workers = options.workers.unwrap_or(settings.runner.workers);
    let runner = JobRunner::new(orchestrator, workers).with_progress(true);

    if let Some(folder) = options.folder {
        let path = input_dir.join(&folder);
        if !path.is_dir() {
            Output::error(&format!("Folder not found: {}", path.display()));
            bail!("Folder not found: {}", path.display());
        }

        Output::info(&format!("Processing single folder: {}", folder));
        let result = runner.run_one(WorkItem::new(path)).await;
        Output::job_result(&result);
        if !result.success {
            bail!("Failed to process {}", folder);
        }
    } else {
        let items = discover(&input_dir, options.limit)?;
        if items.is_empty() {
            Output::warning(&format!("No folders found in {}", input_dir.display()));
            return Ok(());
        }

        Output::info(&format!(
            "Found {} folder(s) in {}, using {} workers",
            items.len(),
            input_dir.display(),
            runner.workers()
        ));

        let report = runner.run(items).await;
        Output::run_summary(&report);

        if let Some(report_path) = options.report {
            let path = PathBuf::from(shellexpand::tilde(&report_path).to_string());
            std::fs::write(&path, report.to_json()?)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            Output::info(&format!("Report written to {}", path.display()));
        }
    }

    if !options.no_index {
        let (index_path, entries) = write_index(&output_dir, &settings.site)?;
        Output::success(&format!(
            "Generated {} with {} videos",
            index_path.display(),
            entries.len()
        ));
    }

    Ok(())
}
