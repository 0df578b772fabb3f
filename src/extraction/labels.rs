use crate::models::{ExtractionVocabulary, FieldLabel, LabelMatch, SegmentedLine};
use regex::Regex;

const ALL_LABELS: [FieldLabel; 10] = [
    FieldLabel::PatientName,
    FieldLabel::MemberName,
    FieldLabel::Diagnosis,
    FieldLabel::Medication,
    FieldLabel::Procedure,
    FieldLabel::Admission,
    FieldLabel::Discharge,
    FieldLabel::TotalAmount,
    FieldLabel::Age,
    FieldLabel::Dob,
];

/// Compiles the vocabulary's label phrases into per-field regexes, once, and
/// scans segmented lines for label occurrences. Matching is case-insensitive
/// and tolerates the usual separators after a label (colon, dashes, tabs).
pub struct LabelScanner {
    patterns: Vec<(FieldLabel, Regex)>,
}

impl LabelScanner {
    pub fn new(vocab: &ExtractionVocabulary) -> Self {
        let patterns = ALL_LABELS
            .iter()
            .filter(|label| !vocab.labels_for(**label).is_empty())
            .map(|&label| (label, Regex::new(&phrase_pattern(vocab.labels_for(label))).unwrap()))
            .collect();
        LabelScanner { patterns }
    }

    /// Scan every line for every label. All occurrences are retained in
    /// document order; later stages decide which to use.
    pub fn scan(&self, lines: &[SegmentedLine]) -> LabelIndex {
        let mut matches = Vec::new();
        for line in lines {
            for (label, pattern) in &self.patterns {
                if let Some(caps) = pattern.captures(&line.text) {
                    let trailing = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                    matches.push(LabelMatch {
                        label: *label,
                        line_index: line.index,
                        trailing_text: trailing.to_string(),
                    });
                }
            }
        }
        LabelIndex { matches }
    }
}

/// One alternation per field: phrases are escaped, whitespace made flexible,
/// and whatever follows the label (after optional separators) is captured as
/// the trailing text.
fn phrase_pattern(phrases: &[String]) -> String {
    let alts: Vec<String> = phrases
        .iter()
        .map(|p| regex::escape(p).replace("\\ ", " ").replace(' ', r"\s+"))
        .collect();
    format!(r"(?i)\b(?:{})\b\s*[:;\-]*\s*(.*)$", alts.join("|"))
}

/// Every label occurrence found in a document, in document order.
pub struct LabelIndex {
    matches: Vec<LabelMatch>,
}

impl LabelIndex {
    pub fn matches(&self) -> &[LabelMatch] {
        &self.matches
    }

    pub fn matches_for(&self, label: FieldLabel) -> impl Iterator<Item = &LabelMatch> {
        self.matches.iter().filter(move |m| m.label == label)
    }

    pub fn first_for(&self, label: FieldLabel) -> Option<&LabelMatch> {
        self.matches_for(label).next()
    }

    /// True when the given line carries any label occurrence at all.
    pub fn is_label_line(&self, line_index: usize) -> bool {
        self.matches.iter().any(|m| m.line_index == line_index)
    }

    /// The 1-2 lines following a match, for values that continue on the next
    /// line of the form.
    pub fn context_window<'a>(m: &LabelMatch, lines: &'a [SegmentedLine]) -> &'a [SegmentedLine] {
        let start = (m.line_index + 1).min(lines.len());
        let end = (m.line_index + 3).min(lines.len());
        &lines[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::TextSegmenter;

    fn scan(text: &str) -> (Vec<SegmentedLine>, LabelIndex) {
        let vocab = ExtractionVocabulary::default();
        let lines = TextSegmenter::segment(text);
        let index = LabelScanner::new(&vocab).scan(&lines);
        (lines, index)
    }

    #[test]
    fn captures_trailing_text_after_label() {
        let (_, index) = scan("Patient Name: John Doe");
        let m = index.first_for(FieldLabel::PatientName).unwrap();
        assert_eq!(m.trailing_text, "John Doe");
    }

    #[test]
    fn two_labels_on_one_line_both_match() {
        let (_, index) = scan("Patient Name: John Doe, Member Name: Jane Roe");
        assert!(index.first_for(FieldLabel::PatientName).is_some());
        let member = index.first_for(FieldLabel::MemberName).unwrap();
        assert_eq!(member.trailing_text, "Jane Roe");
    }

    #[test]
    fn matching_is_case_insensitive_and_separator_tolerant() {
        let (_, index) = scan("TOTAL AMOUNT - NGN 72,000");
        let m = index.first_for(FieldLabel::TotalAmount).unwrap();
        assert_eq!(m.trailing_text, "NGN 72,000");
    }

    #[test]
    fn multiple_occurrences_kept_in_document_order() {
        let (_, index) = scan("Diagnosis: Malaria\nnotes\nDiagnosis: Typhoid");
        let matches: Vec<_> = index.matches_for(FieldLabel::Diagnosis).collect();
        assert_eq!(matches.len(), 2);
        assert!(matches[0].line_index < matches[1].line_index);
    }

    #[test]
    fn label_phrases_do_not_match_inside_words() {
        let (_, index) = scan("Average page count: 3");
        assert!(index.first_for(FieldLabel::Age).is_none());
    }

    #[test]
    fn context_window_covers_next_two_lines() {
        let (lines, index) = scan("Member Name:\nJane Roe\nPolicy No: 12345");
        let m = index.first_for(FieldLabel::MemberName).unwrap();
        assert_eq!(m.trailing_text, "");
        let window = LabelIndex::context_window(m, &lines);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].text, "Jane Roe");
    }
}
