use crate::classify::duplicate_ids;
use crate::error::ClassifyError;
use crate::model::{CaseTable, FieldValue, ResultCollection};

/// Copy `table` and append one boolean column per collection entry, named
/// after the label. A row is flagged when its identifier is in that entry's
/// set. Rows and original columns are preserved as-is.
pub fn annotate(
    collection: &ResultCollection,
    table: &CaseTable,
    id_column: &str,
) -> Result<CaseTable, ClassifyError> {
    let id_idx = table.require_column(id_column)?;

    for label in collection.labels() {
        if table.column_index(label).is_some() {
            return Err(ClassifyError::ColumnConflict {
                table: table.name.clone(),
                column: label.to_string(),
            });
        }
    }

    let dupes = duplicate_ids(table, id_column)?;
    if !dupes.is_empty() {
        log::warn!(
            "table '{}': {} identifier(s) appear on several rows; every copy gets the same flags",
            table.name,
            dupes.len()
        );
    }

    let mut labeled = table.clone();
    labeled
        .columns
        .extend(collection.labels().map(str::to_string));

    let width = table.columns.len();
    for row in &mut labeled.rows {
        row.values.resize(width, FieldValue::Missing);
        let id = row.get(id_idx).as_text().map(str::to_string);
        for entry in &collection.entries {
            let flagged = id.as_deref().is_some_and(|id| entry.contains(id));
            row.values.push(FieldValue::Bool(flagged));
        }
    }

    Ok(labeled)
}
