//! Prompt templates for Reelpage.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    /// Prompt for transcript cleanup.
    pub cleanup: CleanupPrompts,
    /// Prompt for topical tag generation.
    pub tags: TagPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// A literal replacement the cleanup model is asked to apply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermSubstitution {
    pub from: String,
    pub to: String,
    /// Free-form qualifier shown to the model, e.g. "word-boundary aware".
    #[serde(default)]
    pub note: Option<String>,
}

impl TermSubstitution {
    fn new(from: &str, to: &str, note: Option<&str>) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            note: note.map(str::to_string),
        }
    }

    /// Render as one instruction line.
    pub fn instruction(&self) -> String {
        match &self.note {
            Some(note) => format!("- Replace \"{}\" with \"{}\" ({})", self.from, self.to, note),
            None => format!("- Replace \"{}\" with \"{}\"", self.from, self.to),
        }
    }
}

/// Prompts for transcript cleanup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupPrompts {
    /// Template with `{{transcript}}`, `{{substitutions}}` and `{{chunk_note}}`.
    pub user: String,
    /// Appended when a transcript is processed in several chunks.
    /// Receives `{{index}}` and `{{total}}`.
    pub chunk_note: String,
    pub substitutions: Vec<TermSubstitution>,
}

impl Default for CleanupPrompts {
    fn default() -> Self {
        Self {
            user: r#"Clean and improve this transcript chunk:

{{transcript}}

Instructions:
- Remove filler words (um, uh, you know, like, etc.) while maintaining text integrity
- Fix obvious typos and spelling errors
- Break text into logical paragraphs for better readability
- Use double line breaks (\n\n) to separate paragraphs
- Ensure each paragraph is a complete thought or topic
{{substitutions}}
- Do NOT rewrite content or add commentary
- Do NOT add any explanations - just return the cleaned transcript{{chunk_note}}

Cleaned transcript:"#
                .to_string(),
            chunk_note: "\nNote: This is chunk {{index}} of {{total}}. Maintain consistent paragraph formatting with other chunks."
                .to_string(),
            substitutions: vec![
                TermSubstitution::new("Julian from RC", "Julien from Arcee", None),
                TermSubstitution::new("RC", "Arcee", Some("case-insensitive, word-boundary aware")),
                TermSubstitution::new("RCMaestro", "Arcee Maestro", None),
                TermSubstitution::new("Quen", "Qwen", Some("word-boundary aware")),
                TermSubstitution::new("DeepSeq", "DeepSeek", Some("word-boundary aware")),
            ],
        }
    }
}

impl CleanupPrompts {
    /// All substitution instructions, one per line.
    pub fn substitution_lines(&self) -> String {
        self.substitutions
            .iter()
            .map(TermSubstitution::instruction)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Prompts for tag generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagPrompts {
    /// Template with `{{transcript}}`.
    pub user: String,
}

impl Default for TagPrompts {
    fn default() -> Self {
        Self {
            user: r#"Generate 3-5 relevant tags for this video transcript. Return only the tags, one per line, no numbering or bullet points:

{{transcript}}

Tags:"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let cleanup_path = custom_path.join("cleanup.toml");
            if cleanup_path.exists() {
                let content = std::fs::read_to_string(&cleanup_path)?;
                prompts.cleanup = toml::from_str(&content)?;
            }

            let tags_path = custom_path.join("tags.toml");
            if tags_path.exists() {
                let content = std::fs::read_to_string(&tags_path)?;
                prompts.tags = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
