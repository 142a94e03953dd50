//! Bounded-concurrency execution of work items.
//!
//! Every item runs in its own task so one failing (or panicking) item never
//! affects the others; at most `workers` items are in flight at a time.

mod report;

pub use report::{JobResult, RunReport, RunSummary};

use crate::orchestrator::Orchestrator;
use crate::source::WorkItem;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

pub const DEFAULT_WORKERS: usize = 5;
pub const MAX_WORKERS: usize = 20;

/// Accept `1..=MAX_WORKERS`; anything else falls back to the default.
pub fn clamp_workers(requested: usize) -> usize {
    if (1..=MAX_WORKERS).contains(&requested) {
        requested
    } else {
        warn!(
            "Worker count {} outside 1-{}, using {}",
            requested, MAX_WORKERS, DEFAULT_WORKERS
        );
        DEFAULT_WORKERS
    }
}

/// Runs the per-folder pipeline over many items.
pub struct JobRunner {
    orchestrator: Arc<Orchestrator>,
    workers: usize,
    show_progress: bool,
}

impl JobRunner {
    pub fn new(orchestrator: Arc<Orchestrator>, workers: usize) -> Self {
        Self {
            orchestrator,
            workers: clamp_workers(workers),
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while running.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run a single item.
    pub async fn run_one(&self, item: WorkItem) -> JobResult {
        run_item(Arc::clone(&self.orchestrator), item).await
    }

    /// Run all items and collect exactly one result per item.
    pub async fn run(&self, items: Vec<WorkItem>) -> RunReport {
        let total = items.len();
        info!("Processing {} folder(s) with {} workers", total, self.workers);

        let pb = self.progress_bar(total);
        let mut results = Vec::with_capacity(total);

        let mut stream = stream::iter(items)
            .map(|item| {
                let name = item.name.clone();
                let started_at = Utc::now();
                let clock = Instant::now();
                let handle = tokio::spawn(run_item(Arc::clone(&self.orchestrator), item));
                async move {
                    match handle.await {
                        Ok(result) => result,
                        Err(e) => {
                            error!("Worker for {} died: {}", name, e);
                            JobResult::failure(name, started_at, clock.elapsed(), format!("Worker task failed: {}", e))
                        }
                    }
                }
            })
            .buffer_unordered(self.workers);

        let (mut succeeded, mut failed) = (0usize, 0usize);
        let mut success_time = Duration::ZERO;
        while let Some(result) = stream.next().await {
            if result.success {
                succeeded += 1;
                success_time += result.duration;
            } else {
                failed += 1;
            }
            let average = if succeeded > 0 {
                (success_time / succeeded as u32).as_secs_f64()
            } else {
                0.0
            };
            pb.set_message(format!("{} ok, {} failed, avg {:.1}s", succeeded, failed, average));
            pb.inc(1);
            results.push(result);
        }

        pb.finish_and_clear();

        let report = RunReport::new(results);
        info!(
            "Run complete: {} succeeded, {} failed",
            report.success_count(),
            report.failure_count()
        );
        report
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("  {spinner:.green} Building [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Process one item, recording its outcome and duration.
async fn run_item(orchestrator: Arc<Orchestrator>, item: WorkItem) -> JobResult {
    let started_at = Utc::now();
    let clock = Instant::now();

    match orchestrator.process(&item).await {
        Ok(processed) => {
            let duration = clock.elapsed();
            info!(
                "Generated {} ({:.2}s)",
                processed.path.display(),
                duration.as_secs_f64()
            );
            JobResult::success(item.name, started_at, duration, processed.path)
        }
        Err(e) => {
            let duration = clock.elapsed();
            error!("Error processing {}: {}", item.name, e);
            JobResult::failure(item.name, started_at, duration, e.to_string())
        }
    }
}
