//! Sentence-aware splitting into overlapping segments.

use super::{is_sentence_terminator, Segment};
use crate::config::RewriteSettings;
use crate::error::{ReelpageError, Result};

/// How far back from a segment's nominal end a sentence end is looked for.
pub const DEFAULT_BOUNDARY_LOOKBACK: usize = 500;

/// Splits documents into segments of at most `max_segment_size` characters
/// that overlap their neighbour by `overlap_size` characters.
///
/// Sizes and the lookback count chars; segment offsets are byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    max_segment_size: usize,
    overlap_size: usize,
    lookback: usize,
}

impl Chunker {
    /// Create a chunker. Fails unless `0 <= overlap_size < max_segment_size`.
    pub fn new(max_segment_size: usize, overlap_size: usize) -> Result<Self> {
        if max_segment_size == 0 {
            return Err(ReelpageError::Config(
                "max segment size must be greater than zero".to_string(),
            ));
        }
        if overlap_size >= max_segment_size {
            return Err(ReelpageError::Config(format!(
                "overlap ({}) must be smaller than the max segment size ({})",
                overlap_size, max_segment_size
            )));
        }

        Ok(Self {
            max_segment_size,
            overlap_size,
            lookback: DEFAULT_BOUNDARY_LOOKBACK,
        })
    }

    /// Build a chunker from the rewrite settings.
    pub fn from_settings(settings: &RewriteSettings) -> Result<Self> {
        Ok(Self::new(settings.max_segment_chars, settings.overlap_chars)?
            .with_lookback(settings.boundary_lookback))
    }

    /// Change the sentence-boundary lookback window.
    pub fn with_lookback(mut self, lookback: usize) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn max_segment_size(&self) -> usize {
        self.max_segment_size
    }

    pub fn overlap_size(&self) -> usize {
        self.overlap_size
    }

    /// Whether the document fits in a single segment.
    pub fn fits(&self, document: &str) -> bool {
        document.len() <= self.max_segment_size
            || document.chars().count() <= self.max_segment_size
    }

    /// Lazily split a document. Each call starts over from offset zero.
    pub fn split<'a>(&self, document: &'a str) -> Segments<'a> {
        Segments {
            chunker: *self,
            document,
            next_start: 0,
        }
    }

    /// End offset of the segment starting at `start`.
    fn segment_end(&self, document: &str, start: usize) -> usize {
        let len = document.len();
        let nominal = advance_chars(document, start, self.max_segment_size);
        if nominal >= len {
            return len;
        }
        let mut end = nominal;

        // Candidates lie strictly above the floor; keeping them above
        // start + overlap guarantees the next segment starts further right.
        let floor = retreat_chars(document, nominal, self.lookback)
            .max(advance_chars(document, start, self.overlap_size.saturating_sub(1)))
            .max(start);

        if floor + 1 < end {
            let window = &document.as_bytes()[floor + 1..end];
            if let Some(pos) = window.iter().rposition(|&b| is_sentence_terminator(b)) {
                end = floor + 1 + pos + 1;
            }
        }

        end
    }

    /// Start offset of the segment following `[start, end)`.
    fn next_start(&self, document: &str, start: usize, end: usize) -> usize {
        let next = retreat_chars(document, end, self.overlap_size);
        if next <= start {
            end
        } else {
            next
        }
    }
}

/// Byte offset `chars` characters after `from`, or the document length.
fn advance_chars(document: &str, from: usize, chars: usize) -> usize {
    document[from..]
        .char_indices()
        .nth(chars)
        .map_or(document.len(), |(i, _)| from + i)
}

/// Byte offset `chars` characters before `from`, or zero.
fn retreat_chars(document: &str, from: usize, chars: usize) -> usize {
    if chars == 0 {
        return from;
    }
    document[..from]
        .char_indices()
        .rev()
        .nth(chars - 1)
        .map_or(0, |(i, _)| i)
}

/// Iterator over the segments of one document.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    chunker: Chunker,
    document: &'a str,
    next_start: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.document.len();
        if self.next_start >= len {
            return None;
        }

        let start = self.next_start;
        let end = self.chunker.segment_end(self.document, start);

        self.next_start = if end < len {
            self.chunker.next_start(self.document, start, end)
        } else {
            len
        };

        Some(Segment {
            start,
            end,
            text: &self.document[start..end],
        })
    }
}

impl std::iter::FusedIterator for Segments<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::sample_document;
    use proptest::prelude::*;

    fn assert_covers(document: &str, chunker: &Chunker) {
        let segments: Vec<_> = chunker.split(document).collect();
        assert!(!segments.is_empty());
        assert_eq!(segments[0].start, 0);
        assert_eq!(segments.last().unwrap().end, document.len());

        for pair in segments.windows(2) {
            assert!(pair[1].start > pair[0].start, "segments must advance");
            assert!(pair[1].start <= pair[0].end, "gap between segments");
        }
        for segment in &segments {
            assert!(segment.text.chars().count() <= chunker.max_segment_size());
            assert_eq!(segment.text, &document[segment.start..segment.end]);
        }
    }

    #[test]
    fn test_rejects_invalid_sizes() {
        assert!(Chunker::new(0, 0).is_err());
        assert!(Chunker::new(100, 100).is_err());
        assert!(Chunker::new(100, 150).is_err());
        assert!(Chunker::new(100, 99).is_ok());
    }

    #[test]
    fn test_empty_document() {
        let chunker = Chunker::new(100, 10).unwrap();
        assert_eq!(chunker.split("").count(), 0);
    }

    #[test]
    fn test_single_segment_shortcut() {
        let chunker = Chunker::new(100, 10).unwrap();
        let document = "A short transcript. It fits.";
        let segments: Vec<_> = chunker.split(document).collect();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start, 0);
        assert_eq!(segments[0].end, document.len());
        assert_eq!(segments[0].text, document);

        let exact = "x".repeat(100);
        assert!(chunker.fits(&exact));
        assert_eq!(chunker.split(&exact).count(), 1);
    }

    #[test]
    fn test_seventy_thousand_chars() {
        let mut document = sample_document(70_000);
        document.truncate(70_000);

        let chunker = Chunker::new(32_000, 2_000).unwrap();
        let segments: Vec<_> = chunker.split(&document).collect();

        assert_eq!(segments.len(), 3);
        // Pulled back to a sentence end within the lookback window
        for segment in &segments[..2] {
            assert!(segment.end > segment.start + 32_000 - 500);
            assert!(is_sentence_terminator(document.as_bytes()[segment.end - 1]));
        }
        // Exact overlap between neighbours
        assert_eq!(segments[1].start, segments[0].end - 2_000);
        assert_eq!(segments[2].start, segments[1].end - 2_000);
        assert_eq!(segments[2].end, 70_000);
        assert_covers(&document, &chunker);
    }

    #[test]
    fn test_mid_sentence_fallback() {
        // No terminators at all: nominal boundaries are kept
        let document = "word ".repeat(100);
        let chunker = Chunker::new(120, 20).unwrap().with_lookback(50);
        let segments: Vec<_> = chunker.split(&document).collect();
        assert_eq!(segments[0].end, 120);
        assert_eq!(segments[1].start, 100);
        assert_covers(&document, &chunker);
    }

    #[test]
    fn test_coverage_for_many_configurations() {
        let document = sample_document(5_000);
        for (max, overlap) in [(50, 0), (50, 49), (200, 30), (501, 500), (1_000, 999), (4_999, 10)] {
            let chunker = Chunker::new(max, overlap).unwrap();
            assert_covers(&document, &chunker);
        }
    }

    #[test]
    fn test_multibyte_text_stays_on_char_boundaries() {
        let document = "Café ünïcödé façade. Naïve résumé! ".repeat(40);
        let chunker = Chunker::new(37, 5).unwrap().with_lookback(20);
        // Slicing inside `split` would panic on a bad boundary
        assert_covers(&document, &chunker);
    }

    #[test]
    fn test_sizes_count_chars_not_bytes() {
        // 90 chars, 110 bytes
        let document = "Ça été très bien. ".repeat(5);
        let chunker = Chunker::new(100, 10).unwrap();
        assert!(chunker.fits(&document));
        let segments: Vec<_> = chunker.split(&document).collect();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, document);

        // Windows hold max chars even when that is more bytes
        let document = "é".repeat(250);
        let chunker = Chunker::new(100, 10).unwrap().with_lookback(0);
        let segments: Vec<_> = chunker.split(&document).collect();
        assert_eq!(segments[0].text.chars().count(), 100);
        assert_eq!(segments[0].end, 200);
        assert_eq!(segments[1].start, 180);
        assert_covers(&document, &chunker);
    }

    #[test]
    fn test_lookback_counts_chars() {
        // The only sentence end sits 30 chars (60 bytes) before the nominal edge
        let document = format!("{}.{}", "ü".repeat(69), "ü".repeat(200));
        let chunker = Chunker::new(100, 0).unwrap().with_lookback(40);
        let first = chunker.split(&document).next().unwrap();
        assert_eq!(first.text.chars().count(), 70);
        assert!(first.text.ends_with('.'));

        let short = Chunker::new(100, 0).unwrap().with_lookback(20);
        assert_eq!(short.split(&document).next().unwrap().text.chars().count(), 100);
    }

    proptest! {
        #[test]
        fn test_split_covers_any_document(
            document in "[a-zéü .!?\n]{1,600}",
            (max, overlap) in (1usize..120).prop_flat_map(|max| (Just(max), 0..max)),
            lookback in 0usize..200
        ) {
            let chunker = Chunker::new(max, overlap).unwrap().with_lookback(lookback);
            assert_covers(&document, &chunker);
            prop_assert_eq!(chunker.split(&document).count() == 1, chunker.fits(&document));
        }
    }

    #[test]
    fn test_split_is_restartable() {
        let document = sample_document(3_000);
        let chunker = Chunker::new(400, 50).unwrap();
        let first: Vec<_> = chunker.split(&document).collect();
        let second: Vec<_> = chunker.split(&document).collect();
        assert_eq!(first, second);
    }
}
