use crate::models::FieldLabel;
use crate::utils::ExtractError;
use serde::{Deserialize, Serialize};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

/// The swappable rule vocabularies driving every extractor: label phrases,
/// exclusion keywords, medical keyword lists and the accepted date formats.
///
/// Extractors never hard-code list data; growing a vocabulary means editing
/// (or externally loading) this structure, not touching extractor logic.
/// `Default` supplies the built-in lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionVocabulary {
    pub patient_name_labels: Vec<String>,
    pub member_name_labels: Vec<String>,
    pub diagnosis_labels: Vec<String>,
    pub medication_labels: Vec<String>,
    pub procedure_labels: Vec<String>,
    pub admission_labels: Vec<String>,
    pub discharge_labels: Vec<String>,
    pub total_amount_labels: Vec<String>,
    pub age_labels: Vec<String>,
    pub dob_labels: Vec<String>,
    /// Words marking facility/provider headers rather than person fields.
    pub facility_keywords: Vec<String>,
    /// Titles dropped while reducing a name candidate to two tokens.
    pub honorifics: Vec<String>,
    /// Form-label words dropped from name candidates.
    pub field_words: Vec<String>,
    /// Words whose proximity marks member/insured context.
    pub member_context_keywords: Vec<String>,
    pub diagnosis_keywords: Vec<String>,
    pub procedure_keywords: Vec<String>,
    /// Pharmaceutical form tokens (tablets, syrup, ...) used to spot
    /// medication lines and locate quantities.
    pub medication_form_tokens: Vec<String>,
    /// chrono format strings tried in order when parsing a date token.
    pub date_formats: Vec<String>,
}

impl Default for ExtractionVocabulary {
    fn default() -> Self {
        ExtractionVocabulary {
            patient_name_labels: words(&[
                "patient name",
                "patient's name",
                "name of patient",
                "pt name",
                "pt. name",
            ]),
            member_name_labels: words(&[
                "member name",
                "member's name",
                "name of member",
                "insured name",
                "policy holder",
                "policyholder",
                "subscriber",
                "beneficiary",
            ]),
            diagnosis_labels: words(&["diagnoses", "diagnosis", "dx"]),
            medication_labels: words(&["medications", "medication", "drugs", "prescription", "rx"]),
            procedure_labels: words(&["procedures", "procedure", "treatments", "treatment", "services rendered"]),
            admission_labels: words(&[
                "admission date",
                "date of admission",
                "admitted on",
                "admitted",
                "admission",
            ]),
            discharge_labels: words(&[
                "discharge date",
                "date of discharge",
                "discharged on",
                "discharged",
                "discharge",
            ]),
            total_amount_labels: words(&[
                "net amount",
                "net value",
                "net total",
                "net payable",
                "net amt",
                "total amount",
                "total value",
                "total payable",
                "total due",
                "total bill",
                "final amount",
                "final total",
                "grand total",
                "billing amount",
                "billing total",
                "bill amount",
                "invoice amount",
                "invoice total",
                "invoice value",
                "amount due",
                "amount payable",
                "balance due",
                "balance payable",
                "sub total",
                "subtotal",
                "payable amount",
            ]),
            age_labels: words(&["age"]),
            dob_labels: words(&["date of birth", "birth date", "d.o.b", "dob"]),
            facility_keywords: words(&[
                "hospital",
                "clinic",
                "medical",
                "center",
                "centre",
                "facility",
                "ward",
                "department",
            ]),
            honorifics: words(&["mr", "mrs", "ms", "dr", "prof", "miss", "mx", "rev"]),
            field_words: words(&[
                "patient",
                "member",
                "insured",
                "policyholder",
                "subscriber",
                "beneficiary",
                "name",
                "dob",
                "age",
                "address",
            ]),
            member_context_keywords: words(&[
                "member",
                "insured",
                "policy",
                "subscriber",
                "beneficiary",
                "policy no",
                "policy number",
            ]),
            diagnosis_keywords: words(&[
                "malaria",
                "typhoid",
                "diabetes",
                "hypertension",
                "asthma",
                "fracture",
                "bronchitis",
                "heart attack",
                "stroke",
                "infection",
                "allergy",
                "covid-19",
                "pneumonia",
                "arthritis",
            ]),
            procedure_keywords: words(&[
                "test",
                "x-ray",
                "xray",
                "scan",
                "procedure",
                "operation",
                "surgery",
                "lab",
                "consultation",
                "nursing care",
                "medication",
            ]),
            medication_form_tokens: words(&[
                "tablets",
                "tablet",
                "tabs",
                "tab",
                "capsules",
                "capsule",
                "caps",
                "sachets",
                "sachet",
                "bottles",
                "bottle",
                "vials",
                "vial",
                "cream",
                "ointment",
                "patch",
                "suppository",
                "syrup",
                "syp",
                "injection",
            ]),
            date_formats: words(&[
                "%Y-%m-%d",
                "%d/%m/%Y",
                "%m/%d/%Y",
                "%d-%m-%Y",
                "%d %B %Y",
                "%d %b %Y",
            ]),
        }
    }
}

impl ExtractionVocabulary {
    /// Label phrases for one field, longest-phrase-first as listed.
    pub fn labels_for(&self, label: FieldLabel) -> &[String] {
        match label {
            FieldLabel::PatientName => &self.patient_name_labels,
            FieldLabel::MemberName => &self.member_name_labels,
            FieldLabel::Diagnosis => &self.diagnosis_labels,
            FieldLabel::Medication => &self.medication_labels,
            FieldLabel::Procedure => &self.procedure_labels,
            FieldLabel::Admission => &self.admission_labels,
            FieldLabel::Discharge => &self.discharge_labels,
            FieldLabel::TotalAmount => &self.total_amount_labels,
            FieldLabel::Age => &self.age_labels,
            FieldLabel::Dob => &self.dob_labels,
        }
    }

    /// Load an externally maintained vocabulary from JSON. Missing fields
    /// fall back to the built-in lists.
    pub fn from_json(json: &str) -> Result<Self, ExtractError> {
        serde_json::from_str(json).map_err(|e| ExtractError::InvalidVocabulary(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_has_labels_for_every_field() {
        let vocab = ExtractionVocabulary::default();
        for label in [
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
        ] {
            assert!(!vocab.labels_for(label).is_empty(), "{:?} has no label phrases", label);
        }
    }

    #[test]
    fn partial_json_override_keeps_defaults_elsewhere() {
        let vocab = ExtractionVocabulary::from_json(r#"{"diagnosis_keywords": ["dengue"]}"#).unwrap();
        assert_eq!(vocab.diagnosis_keywords, vec!["dengue".to_string()]);
        assert!(!vocab.facility_keywords.is_empty());
    }

    #[test]
    fn malformed_json_is_reported_as_invalid_vocabulary() {
        assert!(matches!(
            ExtractionVocabulary::from_json("{not json"),
            Err(ExtractError::InvalidVocabulary(_))
        ));
    }
}
