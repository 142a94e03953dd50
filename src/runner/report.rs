//! Per-item results and the run report.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::time::Duration;

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Outcome of one work item.
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    pub name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(rename = "duration_secs", serialize_with = "as_secs")]
    pub duration: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl JobResult {
    pub fn success(name: String, started_at: DateTime<Utc>, duration: Duration, output: PathBuf) -> Self {
        Self {
            name,
            success: true,
            error: None,
            started_at,
            duration,
            output: Some(output),
        }
    }

    pub fn failure(name: String, started_at: DateTime<Utc>, duration: Duration, error: String) -> Self {
        Self {
            name,
            success: false,
            error: Some(error),
            started_at,
            duration,
            output: None,
        }
    }
}

/// All results of one run, in completion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub results: Vec<JobResult>,
}

/// Aggregate figures of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub average_secs: Option<f64>,
    pub total_secs: f64,
}

impl RunReport {
    pub fn new(results: Vec<JobResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &JobResult> {
        self.results.iter().filter(|r| r.success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &JobResult> {
        self.results.iter().filter(|r| !r.success)
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    /// Fraction of items that succeeded; 0.0 for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.success_count() as f64 / self.results.len() as f64
    }

    /// Mean duration of the successful items.
    pub fn average_duration(&self) -> Option<Duration> {
        let count = self.success_count();
        if count == 0 {
            return None;
        }
        let sum: Duration = self.succeeded().map(|r| r.duration).sum();
        Some(sum / count as u32)
    }

    /// Sum of all item durations, failures included.
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total: self.len(),
            succeeded: self.success_count(),
            failed: self.failure_count(),
            success_rate: self.success_rate(),
            average_secs: self.average_duration().map(|d| d.as_secs_f64()),
            total_secs: self.total_duration().as_secs_f64(),
        }
    }

    /// JSON document with the summary followed by every result.
    pub fn to_json(&self) -> crate::error::Result<String> {
        #[derive(Serialize)]
        struct Document<'a> {
            summary: RunSummary,
            results: &'a [JobResult],
        }

        Ok(serde_json::to_string_pretty(&Document {
            summary: self.summary(),
            results: &self.results,
        })?)
    }
}
