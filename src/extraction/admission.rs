use crate::extraction::labels::LabelIndex;
use crate::extraction::patterns::DATE_TOKEN;
use crate::models::{ExtractionVocabulary, FieldLabel};
use chrono::NaiveDate;
use log::debug;

/// Admission status and dates as read from the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdmissionInfo {
    pub was_admitted: bool,
    pub admission_date: Option<NaiveDate>,
    pub discharge_date: Option<NaiveDate>,
}

/// Reads admission/discharge dates only from lines carrying the matching
/// label, so free-floating dates elsewhere in the document are never picked
/// up. The first trailing text that parses wins; unparseable text leaves the
/// field not found.
pub struct AdmissionExtractor;

impl AdmissionExtractor {
    pub fn extract(index: &LabelIndex, vocab: &ExtractionVocabulary) -> AdmissionInfo {
        let admission_date = Self::first_labeled_date(index, FieldLabel::Admission, vocab);
        let discharge_date = Self::first_labeled_date(index, FieldLabel::Discharge, vocab);
        // A discharge mention implies an admission even when the admission
        // row itself was lost by the OCR.
        let was_admitted =
            index.first_for(FieldLabel::Admission).is_some() || index.first_for(FieldLabel::Discharge).is_some();
        AdmissionInfo { was_admitted, admission_date, discharge_date }
    }

    fn first_labeled_date(
        index: &LabelIndex,
        label: FieldLabel,
        vocab: &ExtractionVocabulary,
    ) -> Option<NaiveDate> {
        for m in index.matches_for(label) {
            if let Some(date) = parse_first_date(&m.trailing_text, &vocab.date_formats) {
                return Some(date);
            }
            debug!("{:?} label without a parseable date: {:?}", label, m.trailing_text);
        }
        None
    }
}

/// Find the first date token in `text` that parses under one of the
/// configured formats, trying formats in their listed order.
pub(crate) fn parse_first_date(text: &str, formats: &[String]) -> Option<NaiveDate> {
    for token in DATE_TOKEN.find_iter(text) {
        for format in formats {
            if let Ok(date) = NaiveDate::parse_from_str(token.as_str(), format) {
                return Some(date);
            }
        }
    }
    None
}
