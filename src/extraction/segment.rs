use crate::models::{SegmentedLine, PAGE_BREAK};

/// Splits raw OCR text into logical lines for the extractors. Lines are
/// trimmed, blank lines dropped, and each kept line is tokenized by
/// whitespace for downstream keyword checks. Empty input yields an empty
/// sequence, which downstream stages treat as "no fields found".
pub struct TextSegmenter;

impl TextSegmenter {
    /// Segment a sequence of page texts in page order. Page boundaries are
    /// treated as line breaks, so a boundary marker never appears inside a
    /// segmented line. `index` is the position in the returned sequence.
    pub fn segment_pages(pages: &[String]) -> Vec<SegmentedLine> {
        let mut lines = Vec::new();
        for page in pages {
            Self::push_lines(page, &mut lines);
        }
        lines
    }

    /// Segment a single blob of text (possibly containing page markers).
    pub fn segment(text: &str) -> Vec<SegmentedLine> {
        let mut lines = Vec::new();
        Self::push_lines(text, &mut lines);
        lines
    }

    fn push_lines(text: &str, lines: &mut Vec<SegmentedLine>) {
        for raw in text.split(|c: char| c == '\n' || c == PAGE_BREAK) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let tokens = trimmed.split_whitespace().map(|t| t.to_string()).collect();
            lines.push(SegmentedLine {
                index: lines.len(),
                text: trimmed.to_string(),
                tokens,
            });
        }
    }
}
