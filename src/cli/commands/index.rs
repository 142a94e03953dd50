//! Index command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::render::write_index;
use anyhow::Result;

/// Run the index command.
pub fn run_index(output: Option<String>, mut settings: Settings) -> Result<()> {
    if let Some(output) = output {
        settings.general.output_dir = output;
    }
    let output_dir = settings.output_dir();

    if !output_dir.is_dir() {
        Output::error(&format!(
            "Output directory {} does not exist. Run 'reelpage build' first.",
            output_dir.display()
        ));
        return Ok(());
    }

    let (path, entries) = write_index(&output_dir, &settings.site)?;

    match entries.first() {
        Some(latest) => {
            Output::success(&format!("Generated {} with {} videos", path.display(), entries.len()));
            Output::kv("Latest", &format!("{} ({})", latest.title, latest.date_label));
        }
        None => Output::warning(&format!("No pages found; wrote an empty {}", path.display())),
    }

    Ok(())
}
