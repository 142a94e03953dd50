//! CLI output formatting utilities.

use crate::runner::{JobResult, RunReport};
use console::style;
use std::time::Duration;

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print one finished item.
    pub fn job_result(result: &JobResult) {
        if result.success {
            println!(
                "  {} {} ({})",
                style("✓").green(),
                style(&result.name).bold(),
                format_duration(result.duration)
            );
        } else {
            println!(
                "  {} {} - {}",
                style("✗").red(),
                style(&result.name).bold(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    /// Print the summary of a run.
    pub fn run_summary(report: &RunReport) {
        Output::header("Processing Summary");
        Output::kv("Total folders", &report.len().to_string());
        Output::kv("Successful", &report.success_count().to_string());
        Output::kv("Failed", &report.failure_count().to_string());
        Output::kv("Success rate", &format!("{:.1}%", report.success_rate() * 100.0));
        if let Some(average) = report.average_duration() {
            Output::kv("Average time", &format_duration(average));
        }
        Output::kv("Total time", &format_duration(report.total_duration()));

        if report.failure_count() > 0 {
            println!("\n{}", style("Failed folders").bold());
            for result in report.failed() {
                Output::job_result(result);
            }
        }

        if report.success_count() > 0 {
            println!("\n{}", style("Generated pages").bold());
            for result in report.succeeded() {
                Output::job_result(result);
            }
        }
    }
}

/// Format a duration as a short human-readable string.
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs_f64();
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{:.2}s", seconds)
    }
}
