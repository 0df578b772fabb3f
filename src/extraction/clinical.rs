use crate::extraction::labels::LabelIndex;
use crate::extraction::name::{contains_any, is_facility_line};
use crate::models::{ExtractionVocabulary, FieldLabel, SegmentedLine};
use std::collections::{HashMap, HashSet};

/// Procedure lines: drawn from the procedures label or from free text with
/// procedure keywords. Lines with digits are cleaned down to their wording
/// and must keep at least two words to survive.
pub struct ProcedureExtractor;

impl ProcedureExtractor {
    pub fn extract(
        lines: &[SegmentedLine],
        index: &LabelIndex,
        vocab: &ExtractionVocabulary,
    ) -> Vec<String> {
        collect_lines(lines, index, FieldLabel::Procedure, &vocab.procedure_keywords, vocab, true)
    }
}

/// Diagnosis lines: same candidate sourcing and rejection rules, gated on
/// condition/illness keywords, kept as written.
pub struct DiagnosisExtractor;

impl DiagnosisExtractor {
    pub fn extract(
        lines: &[SegmentedLine],
        index: &LabelIndex,
        vocab: &ExtractionVocabulary,
    ) -> Vec<String> {
        collect_lines(lines, index, FieldLabel::Diagnosis, &vocab.diagnosis_keywords, vocab, false)
    }
}

/// Shared candidate walk, in document order. A line is rejected when it ends
/// with a colon (a form label, not a value), has no alphabetic content, sits
/// on a facility header, or carries none of the required keywords. Survivors
/// are trimmed and deduplicated case-insensitively, first occurrence first.
fn collect_lines(
    lines: &[SegmentedLine],
    index: &LabelIndex,
    label: FieldLabel,
    keywords: &[String],
    vocab: &ExtractionVocabulary,
    strip_digits: bool,
) -> Vec<String> {
    let mut label_trailing: HashMap<usize, &str> = HashMap::new();
    let mut list_context: HashSet<usize> = HashSet::new();
    for m in index.matches_for(label) {
        label_trailing.insert(m.line_index, m.trailing_text.as_str());
        for line in LabelIndex::context_window(m, lines) {
            if !index.is_label_line(line.index) {
                list_context.insert(line.index);
            }
        }
    }

    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for line in lines {
        let text = if let Some(trailing) = label_trailing.get(&line.index) {
            *trailing
        } else if list_context.contains(&line.index) || contains_any(&line.text, keywords) {
            line.text.as_str()
        } else {
            continue;
        };
        let value = match accept_line(text, keywords, vocab, strip_digits) {
            Some(value) => value,
            None => continue,
        };
        if seen.insert(value.to_lowercase()) {
            values.push(value);
        }
    }
    values
}

fn accept_line(
    text: &str,
    keywords: &[String],
    vocab: &ExtractionVocabulary,
    strip_digits: bool,
) -> Option<String> {
    let trimmed = collapse_whitespace(text);
    if trimmed.is_empty() || trimmed.ends_with(':') {
        return None;
    }
    if !trimmed.chars().any(|c| c.is_alphabetic()) {
        return None;
    }
    if is_facility_line(&trimmed, vocab) {
        return None;
    }
    if !contains_any(&trimmed, keywords) {
        return None;
    }
    if strip_digits && trimmed.chars().any(|c| c.is_ascii_digit()) {
        let cleaned: String = trimmed
            .chars()
            .map(|c| {
                if c.is_ascii_digit() || matches!(c, '-' | '/' | ':' | '.' | ',') {
                    ' '
                } else {
                    c
                }
            })
            .collect();
        let cleaned = collapse_whitespace(&cleaned);
        if !cleaned.chars().any(|c| c.is_alphabetic()) {
            return None;
        }
        // a lone leftover word is a label fragment, not a procedure
        if cleaned.split_whitespace().count() < 2 {
            return None;
        }
        return Some(cleaned);
    }
    Some(trimmed)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{LabelScanner, TextSegmenter};

    fn procedures(text: &str) -> Vec<String> {
        let vocab = ExtractionVocabulary::default();
        let lines = TextSegmenter::segment(text);
        let index = LabelScanner::new(&vocab).scan(&lines);
        ProcedureExtractor::extract(&lines, &index, &vocab)
    }

    fn diagnoses(text: &str) -> Vec<String> {
        let vocab = ExtractionVocabulary::default();
        let lines = TextSegmenter::segment(text);
        let index = LabelScanner::new(&vocab).scan(&lines);
        DiagnosisExtractor::extract(&lines, &index, &vocab)
    }

    #[test]
    fn labeled_diagnosis_value_is_kept() {
        assert_eq!(diagnoses("Diagnosis: Severe Malaria"), vec!["Severe Malaria"]);
    }

    #[test]
    fn free_text_keyword_lines_are_candidates() {
        let found = diagnoses("patient treated for typhoid fever\nfollow-up next week");
        assert_eq!(found, vec!["patient treated for typhoid fever"]);
    }

    #[test]
    fn lines_ending_with_a_colon_are_form_labels() {
        assert!(diagnoses("Diagnosis:").is_empty());
        assert!(procedures("Procedures performed:").is_empty());
    }

    #[test]
    fn keyword_free_lines_are_rejected() {
        assert!(diagnoses("Diagnosis: unremarkable findings").is_empty());
    }

    #[test]
    fn procedure_lines_lose_digits_but_keep_wording() {
        let found = procedures("Chest scan 12/03/2023 ref 44812");
        assert_eq!(found, vec!["Chest scan ref"]);
    }

    #[test]
    fn digit_stripped_single_words_are_rejected() {
        assert!(procedures("Scan 12345").is_empty());
    }

    #[test]
    fn dedup_preserves_first_occurrence_order() {
        let found = procedures("Malaria test\nX-ray chest\nmalaria test");
        assert_eq!(found, vec!["Malaria test", "X-ray chest"]);
    }

    #[test]
    fn list_under_label_is_collected() {
        let found = diagnoses("Diagnosis:\nAsthma exacerbation\nHypertension stage two");
        assert_eq!(found, vec!["Asthma exacerbation", "Hypertension stage two"]);
    }

    #[test]
    fn facility_headers_are_never_values() {
        assert!(procedures("Lagos Hospital surgery department").is_empty());
    }
}
