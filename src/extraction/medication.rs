use crate::extraction::labels::LabelIndex;
use crate::extraction::name::capitalize_token;
use crate::extraction::patterns::{DOSAGE, LEADING_PRODUCT_CODE, QUANTITY_MARKER};
use crate::models::{DosageUnit, ExtractionVocabulary, FieldLabel, Medication, SegmentedLine};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Decomposes medication lines with a three-part grammar: an alphabetic drug
/// name span, an optional `<number><unit>` dosage, and an optional quantity.
/// Lines with no recognizable drug name are skipped, not errored. Duplicates
/// (same normalized name and dosage) keep their first occurrence.
pub struct MedicationExtractor;

impl MedicationExtractor {
    pub fn extract(
        lines: &[SegmentedLine],
        index: &LabelIndex,
        vocab: &ExtractionVocabulary,
    ) -> Vec<Medication> {
        // Lines under a medication label: the label's own trailing text plus
        // the short list window below it.
        let mut label_trailing: HashMap<usize, &str> = HashMap::new();
        let mut list_context: HashSet<usize> = HashSet::new();
        for m in index.matches_for(FieldLabel::Medication) {
            label_trailing.insert(m.line_index, m.trailing_text.as_str());
            for line in LabelIndex::context_window(m, lines) {
                if !index.is_label_line(line.index) {
                    list_context.insert(line.index);
                }
            }
        }

        let mut seen = HashSet::new();
        let mut medications = Vec::new();
        for line in lines {
            let text = if let Some(trailing) = label_trailing.get(&line.index) {
                *trailing
            } else if list_context.contains(&line.index) || Self::looks_like_medication_line(line, vocab) {
                line.text.as_str()
            } else {
                continue;
            };
            if text.trim().is_empty() {
                continue;
            }
            let med = match Self::parse_line(text, vocab) {
                Some(med) => med,
                None => continue,
            };
            if seen.insert(med.dedup_key()) {
                medications.push(med);
            } else {
                debug!("duplicate medication line dropped: {:?}", text);
            }
        }
        medications
    }

    /// Quick filter: a dosage span or a pharmaceutical form token marks a
    /// medication line even outside a labeled list.
    fn looks_like_medication_line(line: &SegmentedLine, vocab: &ExtractionVocabulary) -> bool {
        if DOSAGE.is_match(&line.text) {
            return true;
        }
        line.tokens.iter().any(|t| {
            let token = normalize_token(t);
            vocab.medication_form_tokens.iter().any(|form| *form == token)
        })
    }

    fn parse_line(text: &str, vocab: &ExtractionVocabulary) -> Option<Medication> {
        let line = LEADING_PRODUCT_CODE.replace(text, "");

        let (dosage_amount, dosage_unit) = match DOSAGE.captures(&line) {
            Some(caps) => (caps[1].parse::<f64>().ok(), DosageUnit::parse(&caps[2])),
            None => (None, None),
        };

        // Dosage digits must not be mistaken for a quantity or a name token.
        let without_dosage = DOSAGE.replace_all(&line, " ");
        let quantity = Self::quantity(&without_dosage, vocab);
        let name = Self::name_span(&without_dosage, vocab)?;

        Some(Medication { name, dosage_amount, dosage_unit, quantity })
    }

    /// Quantity preference: an explicit "Qty" marker, then the first integer
    /// after a form token ("tablets 10"), then the first standalone small
    /// integer. Values of 1000 and above are prices or years, not counts.
    fn quantity(text: &str, vocab: &ExtractionVocabulary) -> Option<u32> {
        if let Some(caps) = QUANTITY_MARKER.captures(text) {
            if let Ok(n) = caps[1].parse::<u32>() {
                return Some(n);
            }
        }
        let tokens: Vec<String> = text.split_whitespace().map(normalize_token).collect();
        let form_position = tokens
            .iter()
            .position(|t| vocab.medication_form_tokens.iter().any(|form| form == t));
        if let Some(position) = form_position {
            for token in &tokens[position + 1..] {
                if let Ok(n) = token.parse::<u32>() {
                    if n < 1000 {
                        return Some(n);
                    }
                }
            }
        }
        tokens
            .iter()
            .filter_map(|t| t.parse::<u32>().ok())
            .find(|n| *n < 1000)
    }

    /// The alphabetic drug-name span: what remains after dropping form
    /// tokens, quantity markers, plain numbers and alphanumeric
    /// packaging/product codes. Empty means the line is not a medication.
    fn name_span(text: &str, vocab: &ExtractionVocabulary) -> Option<String> {
        let mut name_tokens = Vec::new();
        for raw in text.split_whitespace() {
            let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
            if token.is_empty() {
                continue;
            }
            let lower = token.to_lowercase();
            if lower == "qty" || vocab.medication_form_tokens.iter().any(|form| *form == lower) {
                continue;
            }
            if token.chars().any(|c| c.is_ascii_digit()) {
                // plain numbers and mixed alphanumeric packaging codes
                continue;
            }
            if !token.chars().all(|c| c.is_alphabetic() || c == '-') {
                continue;
            }
            name_tokens.push(capitalize_token(token));
        }
        if name_tokens.is_empty() {
            return None;
        }
        Some(name_tokens.join(" "))
    }
}

fn normalize_token(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{LabelScanner, TextSegmenter};

    fn extract(text: &str) -> Vec<Medication> {
        let vocab = ExtractionVocabulary::default();
        let lines = TextSegmenter::segment(text);
        let index = LabelScanner::new(&vocab).scan(&lines);
        MedicationExtractor::extract(&lines, &index, &vocab)
    }

    #[test]
    fn full_grammar_line() {
        let meds = extract("Paracetamol 500mg tablets Qty: 2");
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].name, "Paracetamol");
        assert_eq!(meds[0].dosage_amount, Some(500.0));
        assert_eq!(meds[0].dosage_unit, Some(DosageUnit::Mg));
        assert_eq!(meds[0].quantity, Some(2));
    }

    #[test]
    fn dosage_with_space_and_uppercase_unit() {
        let meds = extract("Artemether 80 MG injection");
        assert_eq!(meds[0].dosage_amount, Some(80.0));
        assert_eq!(meds[0].dosage_unit, Some(DosageUnit::Mg));
    }

    #[test]
    fn iu_unit_and_decimal_amounts() {
        let meds = extract("Insulin 2.5ml vial\nVitamin D 1000 IU tablets");
        assert_eq!(meds[0].dosage_amount, Some(2.5));
        assert_eq!(meds[0].dosage_unit, Some(DosageUnit::Ml));
        assert_eq!(meds[1].dosage_amount, Some(1000.0));
        assert_eq!(meds[1].dosage_unit, Some(DosageUnit::Iu));
    }

    #[test]
    fn quantity_after_form_token() {
        let meds = extract("Amoxicillin 250mg capsules 3");
        assert_eq!(meds[0].quantity, Some(3));
    }

    #[test]
    fn leading_product_code_is_stripped() {
        let meds = extract("100234 Ciprofloxacin 500mg tablets");
        assert_eq!(meds[0].name, "Ciprofloxacin");
    }

    #[test]
    fn packaging_codes_never_join_the_name() {
        let meds = extract("Ibuprofen NRX-2210B 400mg tablets");
        assert_eq!(meds[0].name, "Ibuprofen");
    }

    #[test]
    fn duplicates_keep_first_occurrence_position() {
        let meds = extract("Paracetamol 500mg\nAmoxicillin 250mg\nParacetamol 500mg");
        let names: Vec<&str> = meds.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Paracetamol", "Amoxicillin"]);
    }

    #[test]
    fn labeled_list_catches_bare_drug_names() {
        let meds = extract("Medications: Artesunate\nLumefantrine\nTotal Amount: NGN 9,000");
        let names: Vec<&str> = meds.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Artesunate", "Lumefantrine"]);
    }

    #[test]
    fn lines_without_a_drug_name_are_skipped() {
        assert!(extract("250mg 10 tablets").is_empty());
        assert!(extract("see attached invoice").is_empty());
    }

    #[test]
    fn prices_are_not_quantities() {
        let meds = extract("Paracetamol 500mg tablets 1200");
        assert_eq!(meds[0].quantity, None);
    }
}
