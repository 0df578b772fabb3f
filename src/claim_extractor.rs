use crate::extraction::{
    AdmissionExtractor, AgeExtractor, AmountExtractor, DiagnosisExtractor, LabelScanner,
    MedicationExtractor, NameExtractor, ProcedureExtractor, TextSegmenter,
};
use crate::models::{DocumentText, ExtractionVocabulary, StructuredClaim, ValidationIssueType};
use crate::utils::ExtractError;
use crate::validation::ClaimValidator;
use chrono::{Local, NaiveDate};
use log::{info, warn};

/// Orchestrates the whole pipeline: segment, index labels, run every
/// extractor independently, assemble and validate the claim. Extraction is a
/// pure function of the input text and the reference date; the extractors
/// share nothing and their order does not matter.
pub struct ClaimExtractor {
    vocabulary: ExtractionVocabulary,
    scanner: LabelScanner,
    reference_date: Option<NaiveDate>,
}

impl ClaimExtractor {
    pub fn new() -> Self {
        Self::with_vocabulary(ExtractionVocabulary::default())
    }

    pub fn with_vocabulary(vocabulary: ExtractionVocabulary) -> Self {
        let scanner = LabelScanner::new(&vocabulary);
        ClaimExtractor { vocabulary, scanner, reference_date: None }
    }

    /// Pin the date used for age-from-DOB computation. Without this the
    /// current local date is used.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Extract a structured claim from one document. The only hard failure
    /// is absent input; everything else degrades to not-found fields.
    pub fn extract(&self, document: &DocumentText) -> Result<StructuredClaim, ExtractError> {
        if document.is_blank() {
            return Err(ExtractError::InputAbsent);
        }

        let lines = TextSegmenter::segment_pages(document.pages());
        let index = self.scanner.scan(&lines);
        let vocab = &self.vocabulary;
        let reference_date = self
            .reference_date
            .unwrap_or_else(|| Local::now().naive_local().date());

        let patient_name = NameExtractor::extract_patient(&lines, &index, vocab);
        let member_name = NameExtractor::extract_member(&lines, &index, vocab, patient_name.as_deref());
        let age = AgeExtractor::extract(&lines, &index, vocab, reference_date);
        let medications = MedicationExtractor::extract(&lines, &index, vocab);
        let procedures = ProcedureExtractor::extract(&lines, &index, vocab);
        let diagnoses = DiagnosisExtractor::extract(&lines, &index, vocab);
        let admission = AdmissionExtractor::extract(&index, vocab);
        let total_amount = AmountExtractor::extract(&lines, &index, vocab);

        let mut claim = StructuredClaim {
            patient_name,
            member_name,
            age,
            medications,
            procedures,
            diagnoses,
            was_admitted: admission.was_admitted,
            admission_date: admission.admission_date,
            discharge_date: admission.discharge_date,
            date_order_conflict: false,
            total_amount,
        };

        for issue in ClaimValidator::validate(&claim) {
            warn!("claim validation: {}", issue.message);
            if issue.issue_type == ValidationIssueType::Chronology {
                // keep both raw dates for audit, flag the ordering
                claim.date_order_conflict = true;
            }
        }

        info!(
            "extracted claim: patient={} member={} meds={} procedures={} diagnoses={} total={}",
            claim.patient_name.as_deref().unwrap_or("-"),
            claim.member_name.as_deref().unwrap_or("-"),
            claim.medications.len(),
            claim.procedures.len(),
            claim.diagnoses.len(),
            claim
                .total_amount
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
        Ok(claim)
    }

    /// Convenience entry point for callers holding bare page strings.
    pub fn extract_pages(&self, pages: &[String]) -> Result<StructuredClaim, ExtractError> {
        self.extract(&DocumentText::new(pages.to_vec()))
    }
}

impl Default for ClaimExtractor {
    fn default() -> Self {
        Self::new()
    }
}
