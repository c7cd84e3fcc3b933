//! CSV table source and sink.

use crate::error::ClassifyError;
use crate::model::{CaseTable, FieldValue};

/// Load a headered CSV into a `CaseTable`.
///
/// Empty cells become `Missing`, everything else is `Text`. Short rows are
/// padded to the header width.
pub fn load_csv_table(name: &str, csv_data: &str) -> Result<CaseTable, ClassifyError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let width = columns.len();
    let mut table = CaseTable::new(name, columns);

    for record in reader.records() {
        let record = record?;
        let mut values: Vec<FieldValue> = record
            .iter()
            .take(width)
            .map(|v| {
                if v.is_empty() {
                    FieldValue::Missing
                } else {
                    FieldValue::Text(v.to_string())
                }
            })
            .collect();
        values.resize(width, FieldValue::Missing);
        table.push_row(values);
    }

    log::debug!("loaded table '{}': {} rows, {} columns", name, table.len(), width);
    Ok(table)
}

/// Render a table as CSV. Flags render as `True`/`False`, missing as empty.
pub fn write_csv_table(table: &CaseTable) -> Result<String, ClassifyError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.values.iter().map(|v| v.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ClassifyError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ClassifyError::Csv(e.to_string()))
}
