//! Whole-submission validation.
//!
//! A submission is either accepted in full or rejected in full: any blank
//! required field anywhere in the form blocks the export before a single
//! byte is written. Every violation is reported, not just the first, so the
//! user can fix the form in one pass.

use super::models::Submission;

/// Result of validating one submission. `errors` is empty for a valid
/// submission; otherwise it holds one human-readable message per violation,
/// in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Scalar header fields that must be present. `DocumentNumber` is optional.
const REQUIRED_SCALARS: [(&str, fn(&Submission) -> &str); 3] = [
    ("CreatedBy", |s| s.created_by.as_str()),
    ("Source", |s| s.source.as_str()),
    ("Destination", |s| s.destination.as_str()),
];

/// Validate a submission against the strict whole-form policy.
pub fn validate(submission: &Submission) -> ValidationOutcome {
    let mut errors = Vec::new();

    for (name, field) in REQUIRED_SCALARS {
        if field(submission).trim().is_empty() {
            errors.push(format!("{} is required.", name));
        }
    }

    let item_count = submission.item_count();
    if item_count == 0 {
        errors.push("Please add at least one item row.".to_string());
        return ValidationOutcome { errors };
    }

    for index in 0..item_count {
        let row_no = index + 1;
        if blank_at(&submission.parent_codes, index) {
            errors.push(format!("Row {}: ParentCode is required.", row_no));
        }
        if blank_at(&submission.parent_names, index) {
            errors.push(format!("Row {}: ParentName is required.", row_no));
        }
        if blank_at(&submission.quantities, index) {
            errors.push(format!("Row {}: Quantity is required.", row_no));
        }
    }

    ValidationOutcome { errors }
}

/// An entry past the end of a shorter list counts as blank.
fn blank_at(values: &[String], index: usize) -> bool {
    values
        .get(index)
        .map(|v| v.trim().is_empty())
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_submission() -> Submission {
        Submission {
            form_type: "Store Return".to_string(),
            created_by: "alice".to_string(),
            document_number: "DOC-1".to_string(),
            source: "WH1".to_string(),
            destination: "WH2".to_string(),
            parent_codes: vec!["P1".to_string(), "P2".to_string()],
            parent_names: vec!["Widget".to_string(), "Gadget".to_string()],
            quantities: vec!["5".to_string(), "3".to_string()],
        }
    }

    #[test]
    fn accepts_complete_submission() {
        let outcome = validate(&valid_submission());
        assert!(outcome.is_valid(), "unexpected errors: {:?}", outcome.errors);
    }

    #[test]
    fn document_number_is_optional() {
        let mut submission = valid_submission();
        submission.document_number = String::new();
        assert!(validate(&submission).is_valid());
    }

    #[test]
    fn reports_every_blank_field_not_just_the_first() {
        let mut submission = valid_submission();
        submission.created_by = "   ".to_string();
        submission.quantities[1] = String::new();

        let outcome = validate(&submission);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].contains("CreatedBy"));
        assert!(outcome.errors[1].contains("Row 2"));
        assert!(outcome.errors[1].contains("Quantity"));
    }

    #[test]
    fn rejects_submission_with_no_items() {
        let mut submission = valid_submission();
        submission.parent_codes.clear();
        submission.parent_names.clear();
        submission.quantities.clear();

        let outcome = validate(&submission);
        assert!(!outcome.is_valid());
        assert!(outcome.errors.iter().any(|e| e.contains("at least one item")));
    }

    #[test]
    fn short_list_entries_count_as_blank() {
        let mut submission = valid_submission();
        // Third code with no matching name or quantity
        submission.parent_codes.push("P3".to_string());

        let outcome = validate(&submission);
        assert_eq!(
            outcome.errors,
            vec![
                "Row 3: ParentName is required.".to_string(),
                "Row 3: Quantity is required.".to_string(),
            ]
        );
    }

    #[test]
    fn preserves_input_order_of_violations() {
        let submission = Submission {
            form_type: "Store Return".to_string(),
            parent_codes: vec!["P1".to_string()],
            parent_names: vec!["Widget".to_string()],
            quantities: vec!["1".to_string()],
            ..Default::default()
        };

        let outcome = validate(&submission);
        assert_eq!(
            outcome.errors,
            vec![
                "CreatedBy is required.".to_string(),
                "Source is required.".to_string(),
                "Destination is required.".to_string(),
            ]
        );
    }
}
