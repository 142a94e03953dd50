//! Reelpage - static pages from transcribed videos
//!
//! Turns a directory of downloaded video folders into one HTML page per video
//! plus an index. Transcripts are cleaned up by an OpenAI-compatible
//! completion API; transcripts that exceed a single request are split into
//! overlapping segments, rewritten one by one and stitched back together.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `source` - Folder discovery and input extraction
//! - `chunking` - Overlapping segmentation and reassembly
//! - `completion` - Completion service seam and HTTP client
//! - `rewrite` - Fail-soft transcript cleanup and tag generation
//! - `render` - Page and index HTML
//! - `orchestrator` - Per-folder pipeline
//! - `runner` - Bounded-concurrency job runner and run report
//!
//! # Example
//!
//! ```rust,no_run
//! use reelpage::config::Settings;
//! use reelpage::orchestrator::Orchestrator;
//! use reelpage::runner::JobRunner;
//! use reelpage::source::discover;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Arc::new(Orchestrator::new(&settings)?);
//!
//!     let items = discover(&settings.input_dir(), None)?;
//!     let report = JobRunner::new(orchestrator, settings.runner.workers).run(items).await;
//!     println!("{} of {} pages generated", report.success_count(), report.len());
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod render;
pub mod rewrite;
pub mod runner;
pub mod source;

pub use error::{ReelpageError, Result};
