use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::aggregate::compare;
use crate::annotate::annotate;
use crate::classify::{all_ids, duplicate_ids, run_method};
use crate::config::{CollectionConfig, RunConfig, SessionConfig};
use crate::error::ClassifyError;
use crate::model::{
    CaseTable, CollectionOutcome, DuplicateIds, MatchResult, ResultCollection, RunFailure,
    SessionMeta, SessionResult, TermSets,
};

/// Pre-loaded tables (by config name) and term files (by path as written in
/// the config).
#[derive(Debug, Default)]
pub struct SessionInput {
    pub tables: HashMap<String, CaseTable>,
    pub term_files: HashMap<String, String>,
}

/// Run every collection in config order.
///
/// A run that fails (missing column, table not loaded) is recorded in its
/// collection's `failures`; the remaining runs and collections still run.
pub fn run(config: &SessionConfig, input: &SessionInput) -> Result<SessionResult, ClassifyError> {
    let term_sets = config.resolve_term_sets(&input.term_files)?;

    let collections = config
        .collections
        .iter()
        .map(|coll| run_collection(config, coll, &term_sets, input))
        .collect();

    Ok(SessionResult {
        meta: SessionMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        collections,
    })
}

fn run_collection(
    config: &SessionConfig,
    coll: &CollectionConfig,
    term_sets: &BTreeMap<String, TermSets>,
    input: &SessionInput,
) -> CollectionOutcome {
    let mut results = ResultCollection::new(&coll.name);
    let mut failures = Vec::new();

    for run in &coll.runs {
        let outcome = run_entry(config, coll, run, term_sets, input)
            .and_then(|result| results.insert(result));
        if let Err(e) = outcome {
            log::warn!("collection '{}': run '{}' failed: {e}", coll.name, run.label);
            failures.push(RunFailure {
                label: run.label.clone(),
                error: e.to_string(),
            });
        }
    }

    let duplicate_ids = check_duplicates(config, coll, input);
    let report = compare(&results);

    let labeled = if coll.labeled_output.is_some() {
        match label_table(config, coll, &results, input) {
            Ok(table) => Some(table),
            Err(e) => {
                log::warn!("collection '{}': labeled table not built: {e}", coll.name);
                failures.push(RunFailure {
                    label: format!("{} (labeled table)", coll.name),
                    error: e.to_string(),
                });
                None
            }
        }
    } else {
        None
    };

    CollectionOutcome {
        name: coll.name.clone(),
        table: coll.table.clone(),
        results,
        report,
        failures,
        duplicate_ids,
        labeled,
    }
}

fn run_entry(
    config: &SessionConfig,
    coll: &CollectionConfig,
    run: &RunConfig,
    term_sets: &BTreeMap<String, TermSets>,
    input: &SessionInput,
) -> Result<MatchResult, ClassifyError> {
    let source = run.source_table(coll);
    let table = lookup_table(input, source)?;
    let table_config = config
        .tables
        .get(source)
        .ok_or_else(|| ClassifyError::UnknownTable(source.to_string()))?;

    if run.all_ids_of.is_some() {
        return all_ids(&run.label, table, &table_config.id_column);
    }

    // `validate` guarantees both; the fields are public, so a config built
    // by hand can still get here without them.
    let (Some(terms_name), Some(method)) = (&run.terms, run.method) else {
        return Err(ClassifyError::ConfigValidation(format!(
            "run '{}': 'terms' and 'method' are required",
            run.label
        )));
    };
    let terms = term_sets
        .get(terms_name)
        .ok_or_else(|| ClassifyError::UnknownTermSet(terms_name.clone()))?;

    run_method(
        &run.label,
        table,
        &table_config.columns(),
        terms,
        method,
        run.use_exclusions,
    )
}

fn label_table(
    config: &SessionConfig,
    coll: &CollectionConfig,
    results: &ResultCollection,
    input: &SessionInput,
) -> Result<CaseTable, ClassifyError> {
    let table = lookup_table(input, &coll.table)?;
    let id_column = config
        .tables
        .get(&coll.table)
        .map(|t| t.id_column.as_str())
        .ok_or_else(|| ClassifyError::UnknownTable(coll.table.clone()))?;
    annotate(results, table, id_column)
}

/// Duplicate identifiers in every table the collection reads.
fn check_duplicates(
    config: &SessionConfig,
    coll: &CollectionConfig,
    input: &SessionInput,
) -> Vec<DuplicateIds> {
    let mut sources: BTreeSet<&str> = coll.runs.iter().map(|r| r.source_table(coll)).collect();
    sources.insert(coll.table.as_str());

    let mut found = Vec::new();
    for name in sources {
        let (Some(table), Some(table_config)) = (input.tables.get(name), config.tables.get(name)) else {
            continue;
        };
        let Ok(ids) = duplicate_ids(table, &table_config.id_column) else {
            continue;
        };
        if !ids.is_empty() {
            log::warn!(
                "table '{name}': {} duplicate case identifier(s), overlap counts may be understated",
                ids.len()
            );
            found.push(DuplicateIds {
                table: name.to_string(),
                ids,
            });
        }
    }
    found
}

fn lookup_table<'a>(input: &'a SessionInput, name: &str) -> Result<&'a CaseTable, ClassifyError> {
    input
        .tables
        .get(name)
        .ok_or_else(|| ClassifyError::UnknownTable(format!("table '{name}' has no data")))
}
