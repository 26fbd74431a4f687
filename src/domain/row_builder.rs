//! Builds numbered export rows from a validated submission.
//!
//! Pure transformation, no side effects. Every row in a batch shares the
//! timestamp captured once by the caller, so the `CreatedDate` column and
//! the derived filename always agree.

use chrono::NaiveDateTime;

use super::models::{ExportBatch, ExportRow, Submission, CREATED_DATE_FORMAT};

/// Build the export batch for a submission that already passed validation.
///
/// `Sno` is the 1-based position in the produced row sequence. Fields are
/// trimmed here so the CSV never carries stray whitespace from the form.
pub fn build_batch(submission: &Submission, timestamp: NaiveDateTime) -> ExportBatch {
    let variant = submission.variant();
    let created_date = timestamp.format(CREATED_DATE_FORMAT).to_string();
    let transaction_type = variant.transaction_type().to_string();

    let rows = (0..submission.item_count())
        .map(|index| ExportRow {
            sno: (index + 1) as u32,
            created_date: created_date.clone(),
            created_by: submission.created_by.trim().to_string(),
            document_number: submission.document_number.trim().to_string(),
            parent_code: field_at(&submission.parent_codes, index),
            parent_name: field_at(&submission.parent_names, index),
            transaction_type: transaction_type.clone(),
            quantity: field_at(&submission.quantities, index),
            source: submission.source.trim().to_string(),
            destination: submission.destination.trim().to_string(),
        })
        .collect();

    ExportBatch {
        variant,
        timestamp,
        rows,
    }
}

fn field_at(values: &[String], index: usize) -> String {
    values
        .get(index)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::FormVariant;
    use chrono::NaiveDate;

    fn test_timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn submission() -> Submission {
        Submission {
            form_type: "Store Return".to_string(),
            created_by: " alice ".to_string(),
            document_number: "DOC-1".to_string(),
            source: "WH1".to_string(),
            destination: "WH2".to_string(),
            parent_codes: vec!["P1".to_string(), " P2 ".to_string()],
            parent_names: vec!["Widget".to_string(), "Gadget".to_string()],
            quantities: vec!["5".to_string(), "3".to_string()],
        }
    }

    #[test]
    fn one_row_per_line_item_with_sequential_sno() {
        let batch = build_batch(&submission(), test_timestamp());

        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.rows[0].sno, 1);
        assert_eq!(batch.rows[1].sno, 2);
        assert_eq!(batch.rows[0].parent_code, "P1");
        assert_eq!(batch.rows[1].parent_code, "P2");
    }

    #[test]
    fn trims_whitespace_from_every_field() {
        let batch = build_batch(&submission(), test_timestamp());
        assert_eq!(batch.rows[0].created_by, "alice");
        assert_eq!(batch.rows[1].parent_code, "P2");
    }

    #[test]
    fn all_rows_share_one_timestamp() {
        let batch = build_batch(&submission(), test_timestamp());
        for row in &batch.rows {
            assert_eq!(row.created_date, "2025-03-01 10:00:00");
        }
    }

    #[test]
    fn transaction_type_follows_form_variant() {
        let mut s = submission();
        let batch = build_batch(&s, test_timestamp());
        assert_eq!(batch.variant, FormVariant::Return);
        assert_eq!(batch.rows[0].transaction_type, "Return");

        s.form_type = "Store Return Damage".to_string();
        let batch = build_batch(&s, test_timestamp());
        assert_eq!(batch.variant, FormVariant::Damage);
        assert_eq!(batch.rows[0].transaction_type, "Damage");
    }

    #[test]
    fn empty_submission_yields_empty_batch() {
        let s = Submission {
            form_type: "Store Return".to_string(),
            ..Default::default()
        };
        let batch = build_batch(&s, test_timestamp());
        assert!(batch.rows.is_empty());
    }
}
