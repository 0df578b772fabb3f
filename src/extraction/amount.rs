use crate::extraction::labels::LabelIndex;
use crate::extraction::name::is_facility_line;
use crate::extraction::patterns::{AMOUNT_ONLY_LINE, BARE_AMOUNT, CURRENCY_TOKEN};
use crate::extraction::select::select_preferred;
use crate::models::{
    Candidate, CandidateSource, ExtractionVocabulary, FieldLabel, NairaAmount, SegmentedLine,
};
use log::debug;

/// Selects the billed total. A labeled total-amount field wins; without one,
/// the single largest monetary token in the document is assumed to be the
/// total rather than a line item. That fallback is a documented imprecision:
/// a currency-shaped non-total token (a policy ID, a large line item) can be
/// picked up. All values normalize to the canonical ₦ form.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn extract(
        lines: &[SegmentedLine],
        index: &LabelIndex,
        vocab: &ExtractionVocabulary,
    ) -> Option<NairaAmount> {
        let mut candidates = Vec::new();

        for m in index.matches_for(FieldLabel::TotalAmount) {
            if is_facility_line(&lines[m.line_index].text, vocab) {
                continue;
            }
            if let Some(amount) = Self::amount_in_text(&m.trailing_text) {
                candidates.push(Candidate {
                    value: amount,
                    source: CandidateSource::Labeled,
                    line_index: m.line_index,
                });
                continue;
            }
            // Some forms print the figure alone on the line below the label.
            for line in LabelIndex::context_window(m, lines) {
                if AMOUNT_ONLY_LINE.is_match(&line.text) {
                    if let Some(amount) = Self::amount_in_text(&line.text) {
                        candidates.push(Candidate {
                            value: amount,
                            source: CandidateSource::Labeled,
                            line_index: line.index,
                        });
                        break;
                    }
                }
            }
        }

        // Fallback pool: every monetary token in the document, largest first,
        // so selection picks the maximum when no labeled total exists.
        let mut monetary: Vec<(NairaAmount, usize)> = Vec::new();
        for line in lines {
            if is_facility_line(&line.text, vocab) {
                continue;
            }
            for token in CURRENCY_TOKEN.find_iter(&line.text) {
                if let Some(amount) = NairaAmount::parse(token.as_str()) {
                    monetary.push((amount, line.index));
                }
            }
        }
        monetary.sort_by(|a, b| b.0.cmp(&a.0));
        candidates.extend(monetary.into_iter().map(|(value, line_index)| Candidate {
            value,
            source: CandidateSource::Fallback,
            line_index,
        }));

        let picked = select_preferred(candidates)?;
        if picked.source == CandidateSource::Fallback {
            debug!("no labeled total; largest monetary token {} assumed", picked.value);
        }
        Some(picked.value)
    }

    /// A currency-marked token wins over a bare number; the bare form is
    /// accepted because OCR frequently drops the ₦ sign on labeled rows.
    fn amount_in_text(text: &str) -> Option<NairaAmount> {
        if let Some(token) = CURRENCY_TOKEN.find(text) {
            if let Some(amount) = NairaAmount::parse(token.as_str()) {
                return Some(amount);
            }
        }
        BARE_AMOUNT
            .find(text)
            .and_then(|token| NairaAmount::parse(token.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{LabelScanner, TextSegmenter};

    fn extract(text: &str) -> Option<String> {
        let vocab = ExtractionVocabulary::default();
        let lines = TextSegmenter::segment(text);
        let index = LabelScanner::new(&vocab).scan(&lines);
        AmountExtractor::extract(&lines, &index, &vocab).map(|a| a.to_string())
    }

    #[test]
    fn labeled_total_beats_larger_line_items() {
        let text = "Ward fee ₦80,000\nTotal Amount: NGN 72,000";
        assert_eq!(extract(text).as_deref(), Some("₦72,000.00"));
    }

    #[test]
    fn largest_value_fallback_without_a_label() {
        let text = "Consultation NGN 5,000.00\nDrugs ₦12,300.75";
        assert_eq!(extract(text).as_deref(), Some("₦12,300.75"));
    }

    #[test]
    fn labeled_value_on_the_following_line() {
        let text = "Grand Total:\n₦45,200.00";
        assert_eq!(extract(text).as_deref(), Some("₦45,200.00"));
    }

    #[test]
    fn bare_number_accepted_only_on_labeled_rows() {
        assert_eq!(extract("Total Amount: 4,500").as_deref(), Some("₦4,500.00"));
        assert_eq!(extract("Invoice ref 99123"), None);
    }

    #[test]
    fn ngn_suffix_notation_is_recognized() {
        assert_eq!(extract("paid 1,200.5 NGN by card").as_deref(), Some("₦1,200.50"));
    }

    #[test]
    fn no_monetary_tokens_is_not_found() {
        assert_eq!(extract("Patient Name: John Doe"), None);
    }
}
