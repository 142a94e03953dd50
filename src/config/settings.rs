//! Configuration settings for Reelpage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub runner: RunnerSettings,
    pub rewrite: RewriteSettings,
    pub tags: TagSettings,
    pub site: SiteSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory holding one sub-folder per downloaded video.
    pub input_dir: String,
    /// Directory the generated pages are written to.
    pub output_dir: String,
    /// Optional file that receives warnings and errors (e.g. "logs/error.log").
    pub log_file: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            input_dir: "input".to_string(),
            output_dir: "output".to_string(),
            log_file: None,
        }
    }
}

/// Job runner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    /// Number of folders processed concurrently (1-20).
    pub workers: usize,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self { workers: 5 }
    }
}

/// Transcript rewrite (cleanup) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteSettings {
    /// OpenAI-compatible chat completions endpoint.
    pub api_url: String,
    /// Model used for cleanup and tagging.
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Largest document sent in a single request, in bytes.
    pub max_segment_chars: usize,
    /// Overlap between consecutive segments, in bytes.
    pub overlap_chars: usize,
    /// How far back from a segment's nominal end to look for a sentence end.
    pub boundary_lookback: usize,
    /// Run one more rewrite over a reassembled document when it fits.
    pub final_pass: bool,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Combined input + output capacity of the model, in tokens.
    pub context_window_tokens: i64,
    /// Tokens kept free on top of the estimated prompt.
    pub reserve_tokens: i64,
    /// Output budget used when the estimate leaves nothing.
    pub fallback_max_tokens: i64,
    /// Characters per token used for the prompt estimate.
    pub chars_per_token: usize,
    pub stop: Vec<String>,
}

impl Default for RewriteSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.together.xyz/v1/chat/completions".to_string(),
            model: "arcee-ai/virtuoso-large".to_string(),
            api_key_env: "TOGETHER_API_KEY".to_string(),
            max_segment_chars: 32_000,
            overlap_chars: 2_000,
            boundary_lookback: 500,
            final_pass: true,
            temperature: 0.1,
            timeout_secs: 600,
            context_window_tokens: 65_537,
            reserve_tokens: 1_000,
            fallback_max_tokens: 5_000,
            chars_per_token: 3,
            stop: vec![
                "\n\nTranscript:".to_string(),
                "Transcript:".to_string(),
                "---".to_string(),
                "Certainly!".to_string(),
                "Here is the cleaned".to_string(),
                "Cleaned transcript:".to_string(),
            ],
        }
    }
}

impl RewriteSettings {
    /// Read the API key from the configured environment variable.
    ///
    /// Returns `None` when the variable is unset or empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Topical tag generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagSettings {
    /// Ask the service for tags; when false the defaults are used.
    pub enabled: bool,
    /// Only this many leading bytes of the transcript are sent.
    pub max_input_chars: usize,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Maximum number of tags kept from the reply.
    pub max_tags: usize,
    /// Tags used when generation is unavailable or fails.
    pub default_tags: Vec<String>,
    pub stop: Vec<String>,
}

impl Default for TagSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_input_chars: 32_000,
            max_tokens: 100,
            temperature: 0.3,
            timeout_secs: 30,
            max_tags: 5,
            default_tags: vec![
                "AI".to_string(),
                "Machine Learning".to_string(),
                "Technology".to_string(),
            ],
            stop: vec![
                "\n\n".to_string(),
                "---".to_string(),
                "Transcript:".to_string(),
                "Video:".to_string(),
            ],
        }
    }
}

/// Site-wide presentation settings shared by pages and the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub index_title: String,
    pub index_subtitle: String,
    /// Footer links, keyed by snake_case name (e.g. `youtube_channel`).
    pub links: BTreeMap<String, String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            index_title: "YouTube Videos Collection".to_string(),
            index_subtitle: "A curated collection of videos".to_string(),
            links: BTreeMap::new(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ReelpageError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reelpage")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded input directory path.
    pub fn input_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.input_dir)
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }

    /// Get the expanded log file path, if one is configured.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.general.log_file.as_deref().map(Self::expand_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.runner.workers, 5);
        assert_eq!(settings.rewrite.max_segment_chars, 32_000);
        assert_eq!(settings.rewrite.overlap_chars, 2_000);
        assert_eq!(settings.rewrite.stop.len(), 6);
        assert_eq!(settings.tags.default_tags.len(), 3);
        assert!(settings.site.links.is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [runner]
            workers = 8

            [site.links]
            youtube_channel = "https://youtube.com/@someone"
            "#,
        )
        .unwrap();

        assert_eq!(settings.runner.workers, 8);
        assert_eq!(settings.general.input_dir, "input");
        assert_eq!(settings.rewrite.api_key_env, "TOGETHER_API_KEY");
        assert_eq!(
            settings.site.links.get("youtube_channel").map(String::as_str),
            Some("https://youtube.com/@someone")
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.general.output_dir = "site".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.general.output_dir, "site");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.runner.workers, 5);
    }
}
