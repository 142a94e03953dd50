//! Splitting oversized transcripts into overlapping segments and stitching
//! the rewritten segments back together.
//!
//! The rewrite service only accepts a bounded amount of text per request, so a
//! long transcript is cut into segments that overlap by a fixed width. Every
//! segment remembers where it came from in the original document; after the
//! rewrite those offsets are what lets [`combine`] drop the overlap exactly once.

mod reassembly;
mod splitter;

pub use reassembly::{combine, normalize};
pub use splitter::{Chunker, Segments, DEFAULT_BOUNDARY_LOOKBACK};

use serde::{Deserialize, Serialize};

/// Bytes that end a sentence for boundary detection.
pub(crate) fn is_sentence_terminator(byte: u8) -> bool {
    matches!(byte, b'.' | b'!' | b'?')
}

/// A contiguous slice `[start, end)` of an original document.
///
/// Offsets are byte offsets into the document and always sit on char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

impl<'a> Segment<'a> {
    /// Length of the segment in the original document.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Attach rewritten text while keeping the original offsets.
    pub fn transformed(&self, text: String) -> TransformedSegment {
        TransformedSegment {
            start: self.start,
            end: self.end,
            text,
        }
    }
}

/// A segment whose text has been replaced by the rewrite output.
///
/// `text` may be shorter or longer than `end - start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformedSegment {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl TransformedSegment {
    /// Length of the span this segment covered in the original document.
    pub fn original_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// Largest char boundary at or below `index`.
pub(crate) fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut i = index;
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// The first `chars` characters of `text`.
pub(crate) fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

/// Deterministic prose with sentences of varying length.
#[cfg(test)]
pub(crate) fn sample_document(min_len: usize) -> String {
    let words = [
        "transformers", "attention", "small", "models", "latency", "tokens", "merging",
        "weights", "inference", "evaluation", "benchmarks", "agents",
    ];
    let mut text = String::new();
    let mut i = 0usize;
    while text.len() < min_len {
        let sentence_len = 6 + (i * 7) % 23;
        let mut sentence = String::from("Then");
        for j in 0..sentence_len {
            sentence.push(' ');
            sentence.push_str(words[(i + j * 5) % words.len()]);
        }
        let end = match i % 5 {
            0 => '?',
            3 => '!',
            _ => '.',
        };
        sentence.push(end);
        sentence.push(' ');
        text.push_str(&sentence);
        i += 1;
    }
    text
}
