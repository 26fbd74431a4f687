//! Core data model for export batches.
//!
//! An [`ExportBatch`] is built once per accepted form submission, encoded to
//! CSV exactly once, and discarded after the response is sent. Rows are
//! immutable once built.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Fixed CSV column set. Header and every data row use exactly this order.
pub const COLUMNS: [&str; 10] = [
    "Sno",
    "CreatedDate",
    "CreatedBy",
    "DocumentNumber",
    "ParentCode",
    "ParentName",
    "TransactionType",
    "Quantity",
    "Source",
    "Destination",
];

/// Timestamp format used for the `CreatedDate` column (second precision).
pub const CREATED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The two supported form variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormVariant {
    Return,
    Damage,
}

impl FormVariant {
    /// Parse the `form_type` form field. Anything other than the exact
    /// "Store Return" label is treated as the damage variant.
    pub fn from_form_type(form_type: &str) -> Self {
        if form_type == "Store Return" {
            FormVariant::Return
        } else {
            FormVariant::Damage
        }
    }

    /// Value written to the `TransactionType` column.
    pub fn transaction_type(&self) -> &'static str {
        match self {
            FormVariant::Return => "Return",
            FormVariant::Damage => "Damage",
        }
    }

    /// Filename prefix for this variant.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            FormVariant::Return => "STORE_RETURN",
            FormVariant::Damage => "STORE_RET_DAMAGE",
        }
    }
}

/// One line of the export file. All fields are already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub sno: u32,
    pub created_date: String,
    pub created_by: String,
    pub document_number: String,
    pub parent_code: String,
    pub parent_name: String,
    pub transaction_type: String,
    pub quantity: String,
    pub source: String,
    pub destination: String,
}

/// The ordered rows produced from one submission, plus the timestamp they
/// share. The filename is derived from both.
#[derive(Debug, Clone)]
pub struct ExportBatch {
    pub variant: FormVariant,
    pub timestamp: NaiveDateTime,
    pub rows: Vec<ExportRow>,
}

impl ExportBatch {
    /// `{PREFIX}{yymmddHHMMSS}.CSV`, e.g. `STORE_RET_DAMAGE250301100000.CSV`.
    pub fn filename(&self) -> String {
        format!(
            "{}{}.CSV",
            self.variant.file_prefix(),
            self.timestamp.format("%y%m%d%H%M%S")
        )
    }
}

/// A submission as handed to the domain layer: the chosen variant, the
/// scalar header fields, and the three parallel line-item lists exactly as
/// they arrived from the form.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub form_type: String,
    pub created_by: String,
    pub document_number: String,
    pub source: String,
    pub destination: String,
    pub parent_codes: Vec<String>,
    pub parent_names: Vec<String>,
    pub quantities: Vec<String>,
}

impl Submission {
    pub fn variant(&self) -> FormVariant {
        FormVariant::from_form_type(&self.form_type)
    }

    /// Length of the longest line-item list. Shorter lists are treated as
    /// padded with blanks up to this length.
    pub fn item_count(&self) -> usize {
        self.parent_codes
            .len()
            .max(self.parent_names.len())
            .max(self.quantities.len())
    }
}
