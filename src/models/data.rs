use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Page boundary marker used when pages are concatenated into one text blob.
pub const PAGE_BREAK: char = '\u{000C}';

/// Raw OCR output for one document: one text per source page, in page order.
/// Owned transiently by a single extraction call and never persisted.
#[derive(Debug, Clone)]
pub struct DocumentText {
    pages: Vec<String>,
}

impl DocumentText {
    pub fn new(pages: Vec<String>) -> Self {
        DocumentText { pages }
    }

    pub fn single_page(text: impl Into<String>) -> Self {
        DocumentText { pages: vec![text.into()] }
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Concatenate pages in order with an explicit page boundary marker.
    pub fn join_pages(&self) -> String {
        self.pages.join(&PAGE_BREAK.to_string())
    }

    /// True when there is no recognized text at all (no pages, or every page
    /// blank after trimming). Distinct from "no fields matched".
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }
}

/// One logical line of the segmented document. Read-only after segmentation.
/// `index` is the position in the segmented sequence, not the raw line number.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedLine {
    pub index: usize,
    pub text: String,
    pub tokens: Vec<String>,
}

/// The fixed set of field labels the label index recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldLabel {
    PatientName,
    MemberName,
    Diagnosis,
    Medication,
    Procedure,
    Admission,
    Discharge,
    TotalAmount,
    Age,
    Dob,
}

/// A label occurrence on a segmented line. `trailing_text` is whatever
/// followed the label phrase on the same line; it may be empty when the form
/// puts the value on the next line.
#[derive(Debug, Clone)]
pub struct LabelMatch {
    pub label: FieldLabel,
    pub line_index: usize,
    pub trailing_text: String,
}

/// Provenance of an extracted candidate value. Labeled candidates always
/// outrank context-heuristic candidates, which outrank fallback picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    Labeled,
    ContextHeuristic,
    Fallback,
}

impl CandidateSource {
    /// Selection rank; lower wins.
    pub fn rank(&self) -> u8 {
        match self {
            CandidateSource::Labeled => 0,
            CandidateSource::ContextHeuristic => 1,
            CandidateSource::Fallback => 2,
        }
    }
}

/// A typed candidate value produced by an extractor, carrying its provenance
/// and the line it was found on.
#[derive(Debug, Clone)]
pub struct Candidate<T> {
    pub value: T,
    pub source: CandidateSource,
    pub line_index: usize,
}

/// Dosage units recognized by the medication grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DosageUnit {
    #[serde(rename = "mg")]
    Mg,
    #[serde(rename = "ml")]
    Ml,
    #[serde(rename = "mcg")]
    Mcg,
    #[serde(rename = "g")]
    G,
    #[serde(rename = "IU")]
    Iu,
}

impl DosageUnit {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "mg" => Some(DosageUnit::Mg),
            "ml" => Some(DosageUnit::Ml),
            "mcg" => Some(DosageUnit::Mcg),
            "g" => Some(DosageUnit::G),
            "iu" => Some(DosageUnit::Iu),
            _ => None,
        }
    }
}

impl fmt::Display for DosageUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            DosageUnit::Mg => "mg",
            DosageUnit::Ml => "ml",
            DosageUnit::Mcg => "mcg",
            DosageUnit::G => "g",
            DosageUnit::Iu => "IU",
        };
        write!(f, "{}", s)
    }
}

/// One medication entry decomposed by the medication grammar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Medication {
    pub name: String,
    pub dosage_amount: Option<f64>,
    pub dosage_unit: Option<DosageUnit>,
    pub quantity: Option<u32>,
}

impl Medication {
    /// Deduplication key: normalized name plus dosage. Two lines describing
    /// the same drug at the same dosage collapse to the first occurrence.
    pub fn dedup_key(&self) -> String {
        let dosage = match (self.dosage_amount, self.dosage_unit) {
            (Some(amount), Some(unit)) => format!("{}{}", amount, unit),
            _ => String::new(),
        };
        format!("{}|{}", self.name.to_lowercase(), dosage.to_lowercase())
    }
}

/// A monetary value in Nigerian naira, held as non-negative kobo so that
/// normalization and comparison are exact. `Display` renders the canonical
/// form: `₦` prefix, thousands separators, two fraction digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NairaAmount {
    kobo: i64,
}

impl NairaAmount {
    pub fn from_kobo(kobo: i64) -> Option<Self> {
        if kobo < 0 {
            return None;
        }
        Some(NairaAmount { kobo })
    }

    pub fn kobo(&self) -> i64 {
        self.kobo
    }

    /// Parse a monetary token such as `₦12,300.75`, `NGN 5,000` or
    /// `1,200.5 NGN`. Currency markers, separators and whitespace are
    /// stripped; fraction digits beyond two are dropped.
    pub fn parse(token: &str) -> Option<Self> {
        let cleaned: String = token
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if cleaned.is_empty() || cleaned.starts_with('.') {
            return None;
        }
        let (int_part, frac_part) = match cleaned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (cleaned.as_str(), ""),
        };
        let naira: i64 = int_part.parse().ok()?;
        let mut frac = frac_part.to_string();
        frac.truncate(2);
        while frac.len() < 2 {
            frac.push('0');
        }
        let kobo_frac: i64 = frac.parse().ok()?;
        NairaAmount::from_kobo(naira.checked_mul(100)?.checked_add(kobo_frac)?)
    }
}

impl fmt::Display for NairaAmount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let naira = self.kobo / 100;
        let kobo = self.kobo % 100;
        let digits = naira.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "₦{}.{:02}", grouped, kobo)
    }
}

impl Serialize for NairaAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The assembled output record. Absent fields are `None` and serialize as
/// `null`, never as empty strings or zero. Nothing is mutated after assembly.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StructuredClaim {
    pub patient_name: Option<String>,
    pub member_name: Option<String>,
    pub age: Option<u32>,
    pub medications: Vec<Medication>,
    pub procedures: Vec<String>,
    pub diagnoses: Vec<String>,
    pub was_admitted: bool,
    pub admission_date: Option<NaiveDate>,
    pub discharge_date: Option<NaiveDate>,
    /// Set when the discharge date precedes the admission date. Both raw
    /// dates are retained for audit; consumers needing a sane ordering
    /// should treat the pair as not found.
    pub date_order_conflict: bool,
    pub total_amount: Option<NairaAmount>,
}

#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub issue_type: ValidationIssueType,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssueType {
    Name,
    Amount,
    Chronology,
}
