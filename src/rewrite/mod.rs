//! Transcript cleanup and topical tagging on top of a [`CompletionService`].
//!
//! Both clients are fail-soft: a failed or empty completion never fails the
//! item, it falls back to the original text or to the default tags.
//!
//! [`CompletionService`]: crate::completion::CompletionService

mod cleaner;
mod tags;

pub use cleaner::{output_budget, validate_budget, PositionHint, RewriteClient, MIN_RESERVE_TOKENS};
pub use tags::{parse_tags, TagGenerator};
