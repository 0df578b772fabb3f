use crate::models::{StructuredClaim, ValidationIssue, ValidationIssueType};

/// Structural validation of an assembled claim. Validation never rejects a
/// claim; it reports issues for the assembler to flag or log.
pub struct ClaimValidator;

impl ClaimValidator {
    pub fn validate(claim: &StructuredClaim) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (field, name) in [("patient_name", &claim.patient_name), ("member_name", &claim.member_name)] {
            if let Some(name) = name {
                if name.split_whitespace().count() != 2 {
                    issues.push(ValidationIssue {
                        issue_type: ValidationIssueType::Name,
                        message: format!("{} is not a two-token name: {:?}", field, name),
                    });
                }
            }
        }

        // NairaAmount cannot hold a negative value; a violation here means
        // the amount type itself was constructed incorrectly.
        if let Some(amount) = &claim.total_amount {
            if amount.kobo() < 0 {
                issues.push(ValidationIssue {
                    issue_type: ValidationIssueType::Amount,
                    message: format!("total amount is negative: {}", amount),
                });
            }
        }

        if let (Some(admission), Some(discharge)) = (claim.admission_date, claim.discharge_date) {
            if discharge < admission {
                issues.push(ValidationIssue {
                    issue_type: ValidationIssueType::Chronology,
                    message: format!(
                        "discharge date {} precedes admission date {}",
                        discharge, admission
                    ),
                });
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_claim_is_structurally_valid() {
        assert!(ClaimValidator::validate(&StructuredClaim::default()).is_empty());
    }

    #[test]
    fn discharge_before_admission_is_a_chronology_issue() {
        let claim = StructuredClaim {
            admission_date: Some(date(2023, 4, 9)),
            discharge_date: Some(date(2023, 4, 1)),
            ..StructuredClaim::default()
        };
        let issues = ClaimValidator::validate(&claim);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, ValidationIssueType::Chronology);
    }

    #[test]
    fn ordered_dates_raise_no_issue() {
        let claim = StructuredClaim {
            admission_date: Some(date(2023, 4, 1)),
            discharge_date: Some(date(2023, 4, 1)),
            ..StructuredClaim::default()
        };
        assert!(ClaimValidator::validate(&claim).is_empty());
    }

    #[test]
    fn malformed_name_is_reported() {
        let claim = StructuredClaim {
            patient_name: Some("John".to_string()),
            ..StructuredClaim::default()
        };
        let issues = ClaimValidator::validate(&claim);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, ValidationIssueType::Name);
    }
}
