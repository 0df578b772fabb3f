use crate::extraction::labels::LabelIndex;
use crate::extraction::patterns::CAPITALIZED_PAIR;
use crate::extraction::select::select_preferred;
use crate::models::{Candidate, CandidateSource, ExtractionVocabulary, FieldLabel, SegmentedLine};
use log::debug;

/// Extracts the patient and member names. Both reduce to exactly two
/// alphabetic tokens in `First Last` capitalization; anything that cannot be
/// reduced is discarded rather than reported.
pub struct NameExtractor;

impl NameExtractor {
    pub fn extract_patient(
        lines: &[SegmentedLine],
        index: &LabelIndex,
        vocab: &ExtractionVocabulary,
    ) -> Option<String> {
        let mut candidates = Self::labeled_candidates(FieldLabel::PatientName, lines, index, vocab);
        candidates.extend(Self::patient_heuristic_candidates(lines, index, vocab));
        select_preferred(candidates).map(|c| c.value)
    }

    /// Member extraction is independent of the patient field and may
    /// legitimately produce the same value; the patient name is only used to
    /// rule out heuristic picks, where duplicating the patient is almost
    /// always a mis-pick.
    pub fn extract_member(
        lines: &[SegmentedLine],
        index: &LabelIndex,
        vocab: &ExtractionVocabulary,
        patient_name: Option<&str>,
    ) -> Option<String> {
        let mut candidates = Self::labeled_candidates(FieldLabel::MemberName, lines, index, vocab);
        candidates.extend(Self::member_heuristic_candidates(lines, index, vocab, patient_name));
        select_preferred(candidates).map(|c| c.value)
    }

    fn labeled_candidates(
        label: FieldLabel,
        lines: &[SegmentedLine],
        index: &LabelIndex,
        vocab: &ExtractionVocabulary,
    ) -> Vec<Candidate<String>> {
        let mut out = Vec::new();
        for m in index.matches_for(label) {
            if is_facility_line(&lines[m.line_index].text, vocab) {
                continue;
            }
            if let Some(name) = clean_two_token_name(&m.trailing_text, vocab) {
                out.push(Candidate {
                    value: name,
                    source: CandidateSource::Labeled,
                    line_index: m.line_index,
                });
                continue;
            }
            // The form may put the value on the line after the label.
            for line in LabelIndex::context_window(m, lines) {
                if index.is_label_line(line.index) {
                    continue;
                }
                if let Some(name) = clean_two_token_name(&line.text, vocab) {
                    out.push(Candidate {
                        value: name,
                        source: CandidateSource::Labeled,
                        line_index: line.index,
                    });
                    break;
                }
            }
        }
        debug!("{:?}: {} labeled name candidate(s)", label, out.len());
        out
    }

    /// Unlabeled fallback: the first capitalized two-token pair on a line
    /// free of labels, facility words and member context.
    fn patient_heuristic_candidates(
        lines: &[SegmentedLine],
        index: &LabelIndex,
        vocab: &ExtractionVocabulary,
    ) -> Vec<Candidate<String>> {
        let mut out = Vec::new();
        for line in lines {
            if index.is_label_line(line.index)
                || is_facility_line(&line.text, vocab)
                || near_facility(lines, line.index, vocab)
                || contains_any(&line.text, &vocab.member_context_keywords)
            {
                continue;
            }
            for caps in CAPITALIZED_PAIR.captures_iter(&line.text) {
                let pair = format!("{} {}", &caps[1], &caps[2]);
                if let Some(name) = clean_two_token_name(&pair, vocab) {
                    out.push(Candidate {
                        value: name,
                        source: CandidateSource::ContextHeuristic,
                        line_index: line.index,
                    });
                }
            }
        }
        out
    }

    /// Unlabeled fallback for the member field: capitalized pairs scored by
    /// proximity to member-context keywords (same line beats a two-line
    /// window beats no context), earliest occurrence breaking ties.
    fn member_heuristic_candidates(
        lines: &[SegmentedLine],
        index: &LabelIndex,
        vocab: &ExtractionVocabulary,
        exclude: Option<&str>,
    ) -> Vec<Candidate<String>> {
        let mut scored: Vec<(i32, usize, String)> = Vec::new();
        for line in lines {
            if index.is_label_line(line.index) || is_facility_line(&line.text, vocab) {
                continue;
            }
            let proximity = if contains_any(&line.text, &vocab.member_context_keywords) {
                2
            } else if window_text(lines, line.index, 2)
                .iter()
                .any(|text| contains_any(text, &vocab.member_context_keywords))
            {
                1
            } else {
                0
            };
            for caps in CAPITALIZED_PAIR.captures_iter(&line.text) {
                let pair = format!("{} {}", &caps[1], &caps[2]);
                let name = match clean_two_token_name(&pair, vocab) {
                    Some(name) => name,
                    None => continue,
                };
                if exclude.is_some_and(|p| p.eq_ignore_ascii_case(&name)) {
                    continue;
                }
                scored.push((-proximity, line.index, name));
            }
        }
        scored.sort();
        scored
            .into_iter()
            .map(|(_, line_index, value)| Candidate {
                value,
                source: CandidateSource::ContextHeuristic,
                line_index,
            })
            .collect()
    }
}

/// Reduce a raw candidate to exactly two alphabetic tokens, dropping
/// honorifics, form-label words, facility words, numerals and stray
/// punctuation. Returns `None` when fewer than two usable tokens remain.
pub(crate) fn clean_two_token_name(raw: &str, vocab: &ExtractionVocabulary) -> Option<String> {
    let mut scrubbed = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_alphanumeric() || ch == '\'' || ch == '-' || ch.is_whitespace() {
            scrubbed.push(ch);
        } else {
            scrubbed.push(' ');
        }
    }
    let tokens: Vec<String> = scrubbed
        .split_whitespace()
        .map(|t| t.trim_matches(|c| c == '\'' || c == '-'))
        .filter(|t| !t.is_empty())
        .filter(|t| {
            let lower = t.to_lowercase();
            !vocab.honorifics.iter().any(|w| *w == lower)
                && !vocab.field_words.iter().any(|w| *w == lower)
                && !vocab.facility_keywords.iter().any(|w| *w == lower)
        })
        .filter(|t| t.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-'))
        .take(2)
        .map(capitalize_token)
        .collect();
    if tokens.len() < 2 {
        return None;
    }
    Some(tokens.join(" "))
}

pub(crate) fn capitalize_token(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

pub(crate) fn is_facility_line(text: &str, vocab: &ExtractionVocabulary) -> bool {
    contains_any(text, &vocab.facility_keywords)
}

pub(crate) fn contains_any(text: &str, keywords: &[String]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

fn near_facility(lines: &[SegmentedLine], index: usize, vocab: &ExtractionVocabulary) -> bool {
    window_text(lines, index, 1)
        .iter()
        .any(|text| contains_any(text, &vocab.facility_keywords))
}

/// The texts of the lines within `radius` of `index`, excluding the line
/// itself.
fn window_text<'a>(lines: &'a [SegmentedLine], index: usize, radius: usize) -> Vec<&'a str> {
    let start = index.saturating_sub(radius);
    let end = (index + radius + 1).min(lines.len());
    lines[start..end]
        .iter()
        .filter(|l| l.index != index)
        .map(|l| l.text.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{LabelScanner, TextSegmenter};

    fn extract(text: &str) -> (Option<String>, Option<String>) {
        let vocab = ExtractionVocabulary::default();
        let lines = TextSegmenter::segment(text);
        let index = LabelScanner::new(&vocab).scan(&lines);
        let patient = NameExtractor::extract_patient(&lines, &index, &vocab);
        let member = NameExtractor::extract_member(&lines, &index, &vocab, patient.as_deref());
        (patient, member)
    }

    #[test]
    fn labeled_patient_and_member_on_one_line() {
        let (patient, member) = extract("Patient Name: John Doe, Member Name: Jane Roe");
        assert_eq!(patient.as_deref(), Some("John Doe"));
        assert_eq!(member.as_deref(), Some("Jane Roe"));
    }

    #[test]
    fn honorifics_and_extra_tokens_are_dropped() {
        let (patient, _) = extract("Patient Name: Mr. Adewale Okonkwo Jr 45yrs");
        assert_eq!(patient.as_deref(), Some("Adewale Okonkwo"));
    }

    #[test]
    fn value_on_the_next_line_is_still_labeled() {
        let (_, member) = extract("Member Name:\nJane Roe\nPolicy No: 884-220");
        assert_eq!(member.as_deref(), Some("Jane Roe"));
    }

    #[test]
    fn facility_headers_never_become_names() {
        let (patient, _) = extract("Sunrise Hospital Lagos\nPatient Name: John Doe");
        assert_eq!(patient.as_deref(), Some("John Doe"));
    }

    #[test]
    fn unlabeled_capitalized_pair_is_a_heuristic_fallback() {
        let (patient, _) = extract("Claim form\nAdaeze Nwosu\nfever and headache");
        assert_eq!(patient.as_deref(), Some("Adaeze Nwosu"));
    }

    #[test]
    fn member_heuristic_prefers_names_near_member_context() {
        let text = "Adaeze Nwosu\nnotes one\nnotes two\nnotes three\nPolicy number 884-220\nChika Obi";
        let vocab = ExtractionVocabulary::default();
        let lines = TextSegmenter::segment(text);
        let index = LabelScanner::new(&vocab).scan(&lines);
        let member = NameExtractor::extract_member(&lines, &index, &vocab, None);
        assert_eq!(member.as_deref(), Some("Chika Obi"));
    }

    #[test]
    fn member_heuristic_skips_the_patient_name() {
        let text = "Patient Name: John Doe\nJohn Doe\ninsured person details\nJane Roe";
        let vocab = ExtractionVocabulary::default();
        let lines = TextSegmenter::segment(text);
        let index = LabelScanner::new(&vocab).scan(&lines);
        let member = NameExtractor::extract_member(&lines, &index, &vocab, Some("John Doe"));
        assert_eq!(member.as_deref(), Some("Jane Roe"));
    }

    #[test]
    fn unreducible_candidates_are_not_found() {
        let (patient, _) = extract("Patient Name: 12345");
        assert_eq!(patient, None);
    }

    #[test]
    fn two_token_invariant_holds() {
        for text in [
            "Patient Name: Dr. Ngozi Adichie Chimamanda Amanda",
            "Patient Name: John Doe",
        ] {
            let (patient, _) = extract(text);
            let name = patient.unwrap();
            assert_eq!(name.split_whitespace().count(), 2);
        }
    }
}
