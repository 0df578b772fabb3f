use crate::extraction::admission::parse_first_date;
use crate::extraction::labels::LabelIndex;
use crate::extraction::patterns::{AGE_INLINE, SMALL_INTEGER};
use crate::extraction::select::select_preferred;
use crate::models::{Candidate, CandidateSource, ExtractionVocabulary, FieldLabel, SegmentedLine};
use chrono::{Datelike, NaiveDate};
use log::debug;

const MAX_PLAUSIBLE_AGE: i32 = 120;

/// Extracts the patient age. A labeled age in the plausible human range wins;
/// otherwise a labeled date of birth is converted to whole years against the
/// reference date. Implausible values fall through to the next strategy
/// instead of being reported.
pub struct AgeExtractor;

impl AgeExtractor {
    pub fn extract(
        lines: &[SegmentedLine],
        index: &LabelIndex,
        vocab: &ExtractionVocabulary,
        reference_date: NaiveDate,
    ) -> Option<u32> {
        let mut candidates = Vec::new();

        for m in index.matches_for(FieldLabel::Age) {
            let found = Self::age_in_text(&m.trailing_text)
                .or_else(|| Self::inline_age(&lines[m.line_index].text));
            if let Some(age) = found {
                candidates.push(Candidate {
                    value: age,
                    source: CandidateSource::Labeled,
                    line_index: m.line_index,
                });
            }
        }

        for m in index.matches_for(FieldLabel::Dob) {
            if let Some(dob) = parse_first_date(&m.trailing_text, &vocab.date_formats) {
                if let Some(age) = Self::whole_years_between(dob, reference_date) {
                    debug!("age {} derived from date of birth {}", age, dob);
                    candidates.push(Candidate {
                        value: age,
                        source: CandidateSource::Fallback,
                        line_index: m.line_index,
                    });
                }
            }
        }

        select_preferred(candidates).map(|c| c.value)
    }

    /// First small integer in the trailing text of an age label.
    fn age_in_text(text: &str) -> Option<u32> {
        let caps = SMALL_INTEGER.captures(text)?;
        Self::plausible(caps[1].parse().ok()?)
    }

    /// Same-line forms like "45 years", "45 yrs", "45 y/o".
    fn inline_age(line: &str) -> Option<u32> {
        let caps = AGE_INLINE.captures(line)?;
        Self::plausible(caps[1].parse().ok()?)
    }

    fn plausible(age: i32) -> Option<u32> {
        if (0..=MAX_PLAUSIBLE_AGE).contains(&age) {
            Some(age as u32)
        } else {
            None
        }
    }

    fn whole_years_between(dob: NaiveDate, reference: NaiveDate) -> Option<u32> {
        let mut years = reference.year() - dob.year();
        if (reference.month(), reference.day()) < (dob.month(), dob.day()) {
            years -= 1;
        }
        Self::plausible(years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{LabelScanner, TextSegmenter};

    fn extract_at(text: &str, reference: NaiveDate) -> Option<u32> {
        let vocab = ExtractionVocabulary::default();
        let lines = TextSegmenter::segment(text);
        let index = LabelScanner::new(&vocab).scan(&lines);
        AgeExtractor::extract(&lines, &index, &vocab, reference)
    }

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn labeled_age_wins() {
        assert_eq!(extract_at("Age: 45", reference()), Some(45));
        assert_eq!(extract_at("Patient Name: John Doe, Age: 45 yrs", reference()), Some(45));
    }

    #[test]
    fn labeled_age_beats_dob() {
        assert_eq!(extract_at("DOB: 1990-05-10\nAge: 45", reference()), Some(45));
    }

    #[test]
    fn dob_fallback_computes_whole_years() {
        assert_eq!(extract_at("DOB: 1990-05-10", reference()), Some(34));
        // birthday not yet reached in the reference year
        assert_eq!(extract_at("DOB: 1990-05-11", reference()), Some(33));
    }

    #[test]
    fn implausible_labeled_age_falls_through_to_dob() {
        assert_eq!(extract_at("Age: 450\nDOB: 1990-05-10", reference()), Some(34));
    }

    #[test]
    fn future_dob_is_discarded() {
        assert_eq!(extract_at("DOB: 2050-01-01", reference()), None);
    }

    #[test]
    fn absent_age_and_dob_is_not_found() {
        assert_eq!(extract_at("Patient Name: John Doe", reference()), None);
    }
}
