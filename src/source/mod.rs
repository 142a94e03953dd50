//! Discovery of video folders and extraction of their inputs.
//!
//! Each work item is one directory under the input directory, named
//! `YYYYMMDD_Title` by the downloader and holding:
//!
//! - `*info.json`: metadata; its `id` field is the video id (required)
//! - `*.description`: plain-text description (optional)
//! - `*transcription.json`: `{"transcription": "..."}` (optional)

mod description;
mod folder;

pub use description::linkify_description;
pub use folder::{parse_folder_name, FolderName};

use crate::error::{ReelpageError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const NO_DESCRIPTION: &str = "No description available.";
pub const NO_TRANSCRIPT: &str = "No transcript available.";
pub const EMPTY_TRANSCRIPT: &str = "No transcript content available.";
pub const UNREADABLE_TRANSCRIPT: &str = "Error reading transcript file.";

/// One unit of work: a video folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkItem {
    /// Folder name; also the stem of the generated page.
    pub name: String,
    pub path: PathBuf,
}

impl WorkItem {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }
}

/// List the video folders under `input_dir`, sorted by name.
pub fn discover(input_dir: &Path, limit: Option<usize>) -> Result<Vec<WorkItem>> {
    if !input_dir.is_dir() {
        return Err(ReelpageError::InvalidInput(format!(
            "Input directory '{}' does not exist",
            input_dir.display()
        )));
    }

    let mut items = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            items.push(WorkItem::new(path));
        }
    }
    items.sort_by(|a, b| a.name.cmp(&b.name));

    if let Some(limit) = limit {
        items.truncate(limit);
    }

    debug!("Discovered {} folder(s) in {}", items.len(), input_dir.display());
    Ok(items)
}

/// Transcript text, or the placeholder shown when there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    Text(String),
    Placeholder(&'static str),
}

impl Transcript {
    pub fn as_str(&self) -> &str {
        match self {
            Transcript::Text(text) => text,
            Transcript::Placeholder(text) => text,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Transcript::Placeholder(_))
    }
}

/// Everything read from one video folder.
#[derive(Debug, Clone)]
pub struct VideoInputs {
    pub folder: FolderName,
    pub video_id: String,
    /// Escaped HTML with links and timestamps made clickable.
    pub description_html: String,
    pub transcript: Transcript,
}

/// Read the inputs of one folder.
///
/// Fails when the folder cannot be listed, or when the metadata file is
/// missing, unreadable, invalid or has no `id`. A missing or broken
/// description or transcript only yields a placeholder.
pub async fn extract(item: &WorkItem) -> Result<VideoInputs> {
    let folder = parse_folder_name(&item.name);
    let video_id = read_video_id(item).await?;
    let description_html = read_description(&item.path, &video_id).await?;
    let transcript = read_transcript(&item.path).await?;

    Ok(VideoInputs {
        folder,
        video_id,
        description_html,
        transcript,
    })
}

/// First file in `dir` whose name ends with `suffix`, by file name.
async fn find_file(dir: &Path, suffix: &str) -> Result<Option<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut matches = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(suffix) {
            continue;
        }
        // Follows symlinks, so a linked file still counts
        let path = entry.path();
        if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            matches.push(path);
        }
    }
    matches.sort();
    Ok(matches.into_iter().next())
}

async fn read_video_id(item: &WorkItem) -> Result<String> {
    let Some(path) = find_file(&item.path, "info.json").await? else {
        return Err(ReelpageError::MissingIdentity(item.name.clone()));
    };

    let content = tokio::fs::read_to_string(&path).await?;
    let info: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        ReelpageError::Extraction(format!("Invalid metadata file {}: {}", path.display(), e))
    })?;

    info.get("id")
        .and_then(|id| id.as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ReelpageError::MissingIdentity(item.name.clone()))
}

async fn read_description(dir: &Path, video_id: &str) -> Result<String> {
    let Some(path) = find_file(dir, ".description").await? else {
        return Ok(NO_DESCRIPTION.to_string());
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(text) => Ok(linkify_description(text.trim(), video_id)),
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            Ok(NO_DESCRIPTION.to_string())
        }
    }
}

#[derive(serde::Deserialize)]
struct TranscriptFile {
    #[serde(default)]
    transcription: Option<String>,
}

async fn read_transcript(dir: &Path) -> Result<Transcript> {
    let Some(path) = find_file(dir, "transcription.json").await? else {
        return Ok(Transcript::Placeholder(NO_TRANSCRIPT));
    };

    let parsed = match tokio::fs::read_to_string(&path).await {
        Ok(content) => serde_json::from_str::<TranscriptFile>(&content).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match parsed {
        Ok(file) => match file.transcription {
            Some(text) if !text.trim().is_empty() => Ok(Transcript::Text(text)),
            _ => Ok(Transcript::Placeholder(EMPTY_TRANSCRIPT)),
        },
        Err(e) => {
            warn!("Error reading transcript {}: {}", path.display(), e);
            Ok(Transcript::Placeholder(UNREADABLE_TRANSCRIPT))
        }
    }
}
