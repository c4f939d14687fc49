//! CSV Export functionality
//!
//! Report rows are written with a header row taken from the field names.

use serde::Serialize;
use std::io::Write;

use crate::error::{FundsError, FundsResult};

/// Write serializable rows as CSV
pub fn export_rows_csv<T, W>(rows: &[T], writer: W) -> FundsResult<()>
where
    T: Serialize,
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer
        .flush()
        .map_err(|e| FundsError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        family_id: &'static str,
        note: &'static str,
        amount: f64,
    }

    #[test]
    fn test_quotes_and_header() {
        let rows = vec![
            Row {
                family_id: "F1",
                note: "a, b",
                amount: 12.5,
            },
            Row {
                family_id: "F2",
                note: "",
                amount: 0.0,
            },
        ];
        let mut buffer = Vec::new();
        export_rows_csv(&rows, &mut buffer).unwrap();

        let csv = String::from_utf8(buffer).unwrap();
        assert_eq!(csv, "family_id,note,amount\nF1,\"a, b\",12.5\nF2,,0.0\n");
    }

    #[test]
    fn test_no_rows_writes_nothing() {
        let rows: Vec<Row> = Vec::new();
        let mut buffer = Vec::new();
        export_rows_csv(&rows, &mut buffer).unwrap();
        assert!(buffer.is_empty());
    }
}
