//! Reassembly of rewritten segments and paragraph normalization.

use super::{floor_char_boundary, is_sentence_terminator, TransformedSegment};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn excess_blank_lines() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n\s*\n+").expect("Invalid regex"))
}

fn sentence_then_capital() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([.!?])\s*\n\s*([A-Z])").expect("Invalid regex"))
}

/// Merge rewritten segments into one document, emitting overlapped content once.
///
/// Segments are ordered by their original start offset first. Because a
/// rewrite changes lengths, the end of the overlap inside a segment's new text
/// is estimated proportionally and then moved forward to the next sentence
/// boundary. The result is passed through [`normalize`].
pub fn combine(mut segments: Vec<TransformedSegment>) -> String {
    segments.sort_by_key(|s| s.start);

    let mut iter = segments.into_iter();
    let Some(first) = iter.next() else {
        return String::new();
    };

    let mut result = first.text;
    let mut last_end = first.end;

    for segment in iter {
        if segment.start < last_end {
            let overlap = last_end - segment.start;
            if overlap >= segment.text.len() {
                debug!(
                    "Dropping segment {}..{}: overlap {} covers its {} rewritten bytes",
                    segment.start,
                    segment.end,
                    overlap,
                    segment.text.len()
                );
                continue;
            }
            append(&mut result, fresh_tail(&segment, overlap).trim_start());
        } else {
            append(&mut result, &segment.text);
        }
        last_end = segment.end;
    }

    normalize(&result)
}

/// The part of a segment's rewritten text that follows the overlap.
fn fresh_tail(segment: &TransformedSegment, overlap: usize) -> &str {
    let text = segment.text.as_str();
    let estimate = proportional_offset(overlap, text.len(), segment.original_len());

    match boundary_at_or_after(text, estimate) {
        Some(cut) => &text[cut..],
        None => &text[floor_char_boundary(text, overlap)..],
    }
}

/// Map an offset in the original span onto the rewritten text.
fn proportional_offset(offset: usize, rewritten_len: usize, original_len: usize) -> usize {
    if original_len == 0 {
        return offset.min(rewritten_len);
    }
    offset.saturating_mul(rewritten_len) / original_len
}

/// First position `>= position` that directly follows a sentence terminator.
fn boundary_at_or_after(text: &str, position: usize) -> Option<usize> {
    let from = position.max(1) - 1;
    text.as_bytes()
        .get(from..)?
        .iter()
        .position(|&b| is_sentence_terminator(b))
        .map(|i| from + i + 1)
}

fn append(result: &mut String, piece: &str) {
    if piece.is_empty() {
        return;
    }
    if !result.is_empty() && !result.ends_with(char::is_whitespace) {
        result.push(' ');
    }
    result.push_str(piece);
}

/// Normalize paragraph spacing.
///
/// Runs of three or more line breaks become one blank line, a sentence end
/// followed by a line break and a capital letter becomes a paragraph break,
/// and the trimmed text ends with exactly one blank line. Idempotent.
pub fn normalize(text: &str) -> String {
    let collapsed = excess_blank_lines().replace_all(text, "\n\n");
    let paragraphs = sentence_then_capital().replace_all(&collapsed, "${1}\n\n${2}");

    let trimmed = paragraphs.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    format!("{}\n\n", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::{sample_document, Chunker};
    use proptest::prelude::*;

    fn words(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    fn identity_rewrite(document: &str, chunker: &Chunker) -> Vec<TransformedSegment> {
        chunker
            .split(document)
            .map(|s| s.transformed(s.text.to_string()))
            .collect()
    }

    #[test]
    fn test_identity_rewrite_reproduces_document() {
        let mut document = sample_document(70_000);
        document.truncate(70_000);
        let chunker = Chunker::new(32_000, 2_000).unwrap();

        let segments = identity_rewrite(&document, &chunker);
        assert_eq!(segments.len(), 3);

        let combined = combine(segments);
        assert_eq!(words(&combined), words(&document));
    }

    #[test]
    fn test_identity_rewrite_various_sizes() {
        let document = sample_document(12_000);
        for (max, overlap) in [(1_000, 100), (2_000, 300), (5_000, 1_000)] {
            let chunker = Chunker::new(max, overlap).unwrap();
            let segments = identity_rewrite(&document, &chunker);
            assert!(segments.len() > 1);
            assert_eq!(words(&combine(segments)), words(&document), "max={max} overlap={overlap}");
        }
    }

    #[test]
    fn test_shorter_rewrite_cuts_at_proportional_boundary() {
        // Original: "Alpha one. Beta two. Gamma three. Delta four."
        let segments = vec![
            TransformedSegment {
                start: 0,
                end: 20,
                text: "Alpha one. Beta two.".to_string(),
            },
            TransformedSegment {
                start: 10,
                end: 45,
                text: "Beta. Gamma. Delta.".to_string(),
            },
        ];

        assert_eq!(combine(segments), "Alpha one. Beta two. Gamma. Delta.\n\n");
    }

    #[test]
    fn test_no_boundary_falls_back_to_raw_overlap() {
        let segments = vec![
            TransformedSegment {
                start: 0,
                end: 20,
                text: "alpha one beta two".to_string(),
            },
            TransformedSegment {
                start: 11,
                end: 40,
                text: "beta two gamma three".to_string(),
            },
        ];

        assert_eq!(combine(segments), "alpha one beta two gamma three\n\n");
    }

    #[test]
    fn test_segment_swallowed_by_overlap_is_dropped() {
        let segments = vec![
            TransformedSegment {
                start: 0,
                end: 100,
                text: "First part.".to_string(),
            },
            TransformedSegment {
                start: 50,
                end: 120,
                text: "Tiny.".to_string(),
            },
            TransformedSegment {
                start: 120,
                end: 150,
                text: "Last part.".to_string(),
            },
        ];

        assert_eq!(combine(segments), "First part. Last part.\n\n");
    }

    #[test]
    fn test_unsorted_input_is_ordered() {
        let segments = vec![
            TransformedSegment {
                start: 10,
                end: 20,
                text: "Second.".to_string(),
            },
            TransformedSegment {
                start: 0,
                end: 10,
                text: "First.".to_string(),
            },
        ];

        assert_eq!(combine(segments), "First. Second.\n\n");
    }

    #[test]
    fn test_combine_empty() {
        assert_eq!(combine(Vec::new()), "");
    }

    #[test]
    fn test_normalize_collapses_blank_lines() {
        assert_eq!(normalize("one\n\n\n\ntwo"), "one\n\ntwo\n\n");
        assert_eq!(normalize("one\n \n\t\n two"), "one\n\n two\n\n");
    }

    #[test]
    fn test_normalize_breaks_sentences_on_new_lines() {
        assert_eq!(
            normalize("First sentence.\nSecond one!  \n  Third?\nlowercase stays"),
            "First sentence.\n\nSecond one!\n\nThird?\nlowercase stays\n\n"
        );
    }

    #[test]
    fn test_normalize_trims_and_terminates() {
        assert_eq!(normalize("  \n text \n\n\n"), "text\n\n");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "",
            "plain",
            "A.\nB.\nC",
            "a\n\n \n\n b",
            "End.\n\n\n\n   Start again.\n\n",
            "?\n.\nA",
            "Wow!\n \n \nNext.  \n\n\n\n\nlast",
            "  leading\n\n\n",
            "x.\r\n\r\nY",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }

        let long = sample_document(3_000).replace(". ", ".\n");
        let once = normalize(&long);
        assert_eq!(normalize(&once), once);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2_000))]

        #[test]
        fn test_normalize_is_idempotent_for_any_text(text in "[a-cA-Cé .!?\n\r\t]{0,200}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once.clone());
            if !once.is_empty() {
                prop_assert!(once.ends_with("\n\n"));
                prop_assert!(!once.ends_with("\n\n\n"));
            }
        }
    }
}
