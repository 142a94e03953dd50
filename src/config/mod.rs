//! Configuration module for Reelpage.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{CleanupPrompts, Prompts, TagPrompts, TermSubstitution};
pub use settings::{
    GeneralSettings, PromptSettings, RewriteSettings, RunnerSettings, Settings, SiteSettings,
    TagSettings,
};
