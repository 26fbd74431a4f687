//! CSV serialization for export batches.
//!
//! The output starts with a UTF-8 byte-order mark so Excel and similar
//! tools pick the right encoding when the file is opened by double-click.
//! Quoting and escaping follow standard CSV rules via the `csv` crate.

use anyhow::Result;

use super::models::{ExportBatch, COLUMNS};

/// UTF-8 BOM prepended to every generated file.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Encode a batch to bytes. Deterministic: the same batch always produces
/// byte-identical output.
pub fn encode(batch: &ExportBatch) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(64 + batch.rows.len() * 96);
    buffer.extend_from_slice(&UTF8_BOM);

    let mut writer = csv::Writer::from_writer(&mut buffer);
    writer.write_record(COLUMNS)?;

    for row in &batch.rows {
        let sno = row.sno.to_string();
        writer.write_record([
            sno.as_str(),
            row.created_date.as_str(),
            row.created_by.as_str(),
            row.document_number.as_str(),
            row.parent_code.as_str(),
            row.parent_name.as_str(),
            row.transaction_type.as_str(),
            row.quantity.as_str(),
            row.source.as_str(),
            row.destination.as_str(),
        ])?;
    }

    writer.flush()?;
    drop(writer);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ExportRow, FormVariant};
    use chrono::NaiveDate;

    fn row(sno: u32, code: &str, name: &str, qty: &str) -> ExportRow {
        ExportRow {
            sno,
            created_date: "2025-03-01 10:00:00".to_string(),
            created_by: "alice".to_string(),
            document_number: "DOC-1".to_string(),
            parent_code: code.to_string(),
            parent_name: name.to_string(),
            transaction_type: "Return".to_string(),
            quantity: qty.to_string(),
            source: "WH1".to_string(),
            destination: "WH2".to_string(),
        }
    }

    fn batch(rows: Vec<ExportRow>) -> ExportBatch {
        ExportBatch {
            variant: FormVariant::Return,
            timestamp: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            rows,
        }
    }

    #[test]
    fn output_starts_with_utf8_bom() {
        let bytes = encode(&batch(vec![row(1, "P1", "Widget", "5")])).unwrap();
        assert_eq!(&bytes[..3], &UTF8_BOM);
    }

    #[test]
    fn round_trips_through_a_csv_reader() {
        let bytes = encode(&batch(vec![
            row(1, "P1", "Widget", "5"),
            row(2, "P2", "Gadget", "3"),
        ]))
        .unwrap();

        let mut reader = csv::Reader::from_reader(&bytes[3..]);
        let header: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(header, COLUMNS);

        let records: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "1");
        assert_eq!(&records[0][4], "P1");
        assert_eq!(&records[1][0], "2");
        assert_eq!(&records[1][5], "Gadget");
    }

    #[test]
    fn escapes_quotes_and_delimiters() {
        let bytes = encode(&batch(vec![row(
            1,
            "P,1",
            "10\" Widget",
            "5",
        )]))
        .unwrap();

        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.contains("\"P,1\""));
        assert!(text.contains("\"10\"\" Widget\""));

        let mut reader = csv::Reader::from_reader(&bytes[3..]);
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[4], "P,1");
        assert_eq!(&record[5], "10\" Widget");
    }

    #[test]
    fn encoding_is_deterministic() {
        let b = batch(vec![row(1, "P1", "Widget", "5"), row(2, "P2", "Gadget", "3")]);
        assert_eq!(encode(&b).unwrap(), encode(&b).unwrap());
    }

    #[test]
    fn empty_batch_is_bom_plus_header_only() {
        let bytes = encode(&batch(vec![])).unwrap();
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Sno,CreatedDate,"));
    }
}
