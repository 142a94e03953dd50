//! Doctor command - verify configuration, credentials and directories.

use crate::chunking::Chunker;
use crate::cli::Output;
use crate::config::Settings;
use crate::rewrite::{validate_budget, MIN_RESERVE_TOKENS};
use crate::runner::MAX_WORKERS;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Reelpage Doctor");
    println!();
    println!("Checking configuration...\n");

    let mut checks = Vec::new();

    let sections: [(&str, Vec<CheckResult>); 4] = [
        ("API Configuration", vec![check_api_key(settings)]),
        ("Directories", check_directories(settings)),
        ("Pipeline Settings", check_pipeline(settings)),
        ("Configuration", vec![check_config_file(config_path)]),
    ];

    for (title, results) in sections {
        println!("{}", style(title).bold());
        for check in &results {
            check.print();
        }
        println!();
        checks.extend(results);
    }

    if !settings.site.links.is_empty() {
        println!("{}", style("Site Links").bold());
        for (name, url) in &settings.site.links {
            Output::list_item(&format!("{} → {}", name, url));
        }
        println!();
    }

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before running a build.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Reelpage is ready to use.");
    }

    Ok(())
}

/// Mask all but the ends of a secret.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Check that the completion API key is available.
fn check_api_key(settings: &Settings) -> CheckResult {
    let env = &settings.rewrite.api_key_env;
    match settings.rewrite.api_key() {
        Some(key) => CheckResult::ok(env, &format!("configured ({})", mask_key(&key))),
        None => CheckResult::warning(
            env,
            "not set: transcripts will not be cleaned, default tags will be used",
            &format!("Set with: export {}='...'", env),
        ),
    }
}

/// Check the input and output directories.
fn check_directories(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let input_dir = settings.input_dir();
    if input_dir.is_dir() {
        let folders = std::fs::read_dir(&input_dir)
            .map(|entries| entries.filter_map(|e| e.ok()).filter(|e| e.path().is_dir()).count())
            .unwrap_or(0);
        results.push(CheckResult::ok(
            "Input directory",
            &format!("{} ({} folders)", input_dir.display(), folders),
        ));
    } else {
        results.push(CheckResult::error(
            "Input directory",
            &format!("{} not found", input_dir.display()),
            "Set general.input_dir in the config or pass --input",
        ));
    }

    let output_dir = settings.output_dir();
    if output_dir.is_dir() {
        let pages = std::fs::read_dir(&output_dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_name().to_string_lossy().ends_with(".html"))
                    .count()
            })
            .unwrap_or(0);
        results.push(CheckResult::ok(
            "Output directory",
            &format!("{} ({} pages)", output_dir.display(), pages),
        ));
    } else {
        results.push(CheckResult::warning(
            "Output directory",
            &format!("{} (will be created)", output_dir.display()),
            "Directory will be created on the first build",
        ));
    }

    results
}

/// Check chunking and worker settings.
fn check_pipeline(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    match Chunker::from_settings(&settings.rewrite) {
        Ok(chunker) => results.push(CheckResult::ok(
            "Chunking",
            &format!(
                "{} chars per request, {} overlap",
                chunker.max_segment_size(),
                chunker.overlap_size()
            ),
        )),
        Err(e) => results.push(CheckResult::error(
            "Chunking",
            &e.to_string(),
            "rewrite.overlap_chars must be smaller than rewrite.max_segment_chars",
        )),
    }

    let rewrite = &settings.rewrite;
    match validate_budget(rewrite) {
        Ok(()) => results.push(CheckResult::ok(
            "Token budget",
            &format!(
                "{} context, {} reserve, {} fallback",
                rewrite.context_window_tokens, rewrite.reserve_tokens, rewrite.fallback_max_tokens
            ),
        )),
        Err(e) => results.push(CheckResult::error(
            "Token budget",
            &e.to_string(),
            &format!(
                "rewrite.reserve_tokens must be at least {} and rewrite.fallback_max_tokens positive",
                MIN_RESERVE_TOKENS
            ),
        )),
    }

    let workers = settings.runner.workers;
    if (1..=MAX_WORKERS).contains(&workers) {
        results.push(CheckResult::ok("Workers", &workers.to_string()));
    } else {
        results.push(CheckResult::warning(
            "Workers",
            &format!("{} is outside 1-{}", workers, MAX_WORKERS),
            "The default of 5 will be used",
        ));
    }

    results
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: reelpage config init",
        )
    }
}
