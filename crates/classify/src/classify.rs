use std::collections::{BTreeMap, BTreeSet};

use crate::error::ClassifyError;
use crate::matcher::{MatchMethod, Matcher};
use crate::model::{CaseTable, FieldValue, MatchResult, TableColumns, TermSets};

/// Apply `matcher` to every row's text column and collect the identifiers of
/// matching rows. Both columns are resolved before any row is read.
///
/// Rows with a non-text identifier are skipped; rows with a non-text name
/// never match.
pub fn classify(
    table: &CaseTable,
    columns: &TableColumns,
    matcher: &Matcher,
) -> Result<BTreeSet<String>, ClassifyError> {
    let text_idx = table.require_column(&columns.text_column)?;
    let id_idx = table.require_column(&columns.id_column)?;

    let mut ids = BTreeSet::new();
    for (row_no, row) in table.rows.iter().enumerate() {
        if !matcher.matches(row.get(text_idx)) {
            continue;
        }
        match row.get(id_idx) {
            FieldValue::Text(id) => {
                ids.insert(id.clone());
            }
            other => {
                log::debug!(
                    "table '{}' row {}: matched but identifier is {:?}, skipped",
                    table.name,
                    row_no,
                    other
                );
            }
        }
    }
    Ok(ids)
}

/// Compile `terms` for `method`, classify `table`, and label the result.
///
/// With `use_exclusions = false` the exclusion terms are ignored, which is
/// how the "No Exclude" variants are produced.
pub fn run_method(
    label: &str,
    table: &CaseTable,
    columns: &TableColumns,
    terms: &TermSets,
    method: MatchMethod,
    use_exclusions: bool,
) -> Result<MatchResult, ClassifyError> {
    let exclude: &[String] = if use_exclusions { &terms.exclude } else { &[] };
    let matcher = Matcher::compile(method, &terms.include, exclude);
    let ids = classify(table, columns, &matcher)?;

    log::info!(
        "{label}: {method} match of '{}' over '{}' ({} rows) -> {} cases",
        terms.name,
        table.name,
        table.len(),
        ids.len()
    );

    Ok(MatchResult {
        label: label.to_string(),
        source_table: table.name.clone(),
        ids,
    })
}

/// Every identifier in a table, e.g. a pre-verified medical subset.
pub fn all_ids(label: &str, table: &CaseTable, id_column: &str) -> Result<MatchResult, ClassifyError> {
    let id_idx = table.require_column(id_column)?;
    let ids = table
        .rows
        .iter()
        .filter_map(|r| r.get(id_idx).as_text().map(str::to_string))
        .collect();
    Ok(MatchResult {
        label: label.to_string(),
        source_table: table.name.clone(),
        ids,
    })
}

/// Identifiers that occur on more than one row, in sorted order.
pub fn duplicate_ids(table: &CaseTable, id_column: &str) -> Result<Vec<String>, ClassifyError> {
    let id_idx = table.require_column(id_column)?;
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &table.rows {
        if let Some(id) = row.get(id_idx).as_text() {
            *counts.entry(id).or_insert(0) += 1;
        }
    }
    Ok(counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(id, _)| id.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CaseTable {
        let mut t = CaseTable::new("ct_med", vec!["case_num".into(), "plaintiff".into()]);
        t.push_row(vec!["1".into(), "ACME HOSPITAL".into()]);
        t.push_row(vec!["2".into(), "ACME BANK".into()]);
        t.push_row(vec!["3".into(), FieldValue::Missing]);
        t
    }

    fn sets(include: &[&str], exclude: &[&str]) -> TermSets {
        TermSets::new("test", include, exclude)
    }

    fn ids(v: &[&str]) -> BTreeSet<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_scenario() {
        let r = run_method(
            "exact",
            &table(),
            &TableColumns::default(),
            &sets(&["HOSPITAL"], &["BANK"]),
            MatchMethod::Exact,
            true,
        )
        .unwrap();
        assert_eq!(r.ids, ids(&["1"]));
        assert_eq!(r.source_table, "ct_med");
    }

    #[test]
    fn typo_scenario() {
        let terms = sets(&["HOSPTAL"], &["BANK"]);
        let cols = TableColumns::default();
        let fuzzy = run_method("f", &table(), &cols, &terms, MatchMethod::Fuzzy, true).unwrap();
        let exact = run_method("e", &table(), &cols, &terms, MatchMethod::Exact, true).unwrap();
        assert_eq!(fuzzy.ids, ids(&["1"]));
        assert!(exact.ids.is_empty());
    }

    #[test]
    fn exclusions_can_be_ignored() {
        let terms = sets(&["ACME"], &["BANK"]);
        let cols = TableColumns::default();
        let with = run_method("w", &table(), &cols, &terms, MatchMethod::Exact, true).unwrap();
        let without = run_method("wo", &table(), &cols, &terms, MatchMethod::Exact, false).unwrap();
        assert_eq!(with.ids, ids(&["1"]));
        assert_eq!(without.ids, ids(&["1", "2"]));
    }

    #[test]
    fn duplicates_collapse() {
        let mut t = table();
        t.push_row(vec!["1".into(), "ACME HOSPITAL EAST".into()]);
        let m = Matcher::compile(MatchMethod::Exact, &["HOSPITAL".to_string()], &[]);
        let out = classify(&t, &TableColumns::default(), &m).unwrap();
        assert_eq!(out, ids(&["1"]));
        assert_eq!(duplicate_ids(&t, "case_num").unwrap(), vec!["1".to_string()]);
    }

    #[test]
    fn missing_column_is_reported_before_scan() {
        let cols = TableColumns {
            id_column: "case_num".into(),
            text_column: "party".into(),
        };
        let m = Matcher::compile(MatchMethod::Exact, &["HOSPITAL".to_string()], &[]);
        let err = classify(&table(), &cols, &m).unwrap_err();
        assert!(err.to_string().contains("'party'"));
    }

    #[test]
    fn non_text_identifier_skipped() {
        let mut t = table();
        t.push_row(vec![FieldValue::Missing, "OTHER HOSPITAL".into()]);
        let m = Matcher::compile(MatchMethod::Exact, &["HOSPITAL".to_string()], &[]);
        let out = classify(&t, &TableColumns::default(), &m).unwrap();
        assert_eq!(out, ids(&["1"]));
    }

    #[test]
    fn all_ids_takes_every_text_id() {
        let r = all_ids("verified", &table(), "case_num").unwrap();
        assert_eq!(r.ids, ids(&["1", "2", "3"]));
    }

    #[test]
    fn classify_leaves_table_untouched() {
        let t = table();
        let before = t.clone();
        let m = Matcher::compile(MatchMethod::Fuzzy, &["HOSPITAL".to_string()], &[]);
        classify(&t, &TableColumns::default(), &m).unwrap();
        assert_eq!(t, before);
    }
}
