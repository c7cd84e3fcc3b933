use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;

use crate::error::ClassifyError;
use crate::matcher::MatchMethod;
use crate::model::{TableColumns, TermSets};
use crate::terms::{builtin, parse_term_lines};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SessionConfig {
    pub name: String,
    #[serde(default)]
    pub tables: BTreeMap<String, TableConfig>,
    #[serde(default)]
    pub term_sets: BTreeMap<String, TermSetConfig>,
    #[serde(default)]
    pub collections: Vec<CollectionConfig>,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    pub file: String,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_text_column")]
    pub text_column: String,
}

fn default_id_column() -> String {
    "case_num".into()
}

fn default_text_column() -> String {
    "plaintiff".into()
}

impl TableConfig {
    pub fn columns(&self) -> TableColumns {
        TableColumns {
            id_column: self.id_column.clone(),
            text_column: self.text_column.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Term sets
// ---------------------------------------------------------------------------

/// A named term-set pair. A built-in list, inline terms and term files are
/// concatenated in that order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TermSetConfig {
    #[serde(default)]
    pub builtin: Option<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub include_file: Option<String>,
    #[serde(default)]
    pub exclude_file: Option<String>,
}

impl TermSetConfig {
    /// Term files this set reads, as written in the config.
    pub fn file_refs(&self) -> impl Iterator<Item = &str> {
        self.include_file
            .as_deref()
            .into_iter()
            .chain(self.exclude_file.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Collections + runs
// ---------------------------------------------------------------------------

/// One result collection, scoped to a table context.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    pub name: String,
    /// Default source table for runs and the table the flags are added to.
    pub table: String,
    #[serde(default)]
    pub labeled_output: Option<String>,
    #[serde(default)]
    pub runs: Vec<RunConfig>,
}

/// One labeled entry. Either a term-set classification (`terms` + `method`)
/// or every identifier of a table (`all_ids_of`).
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub label: String,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub method: Option<MatchMethod>,
    #[serde(default = "default_use_exclusions")]
    pub use_exclusions: bool,
    /// Source table override; defaults to the collection's table.
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub all_ids_of: Option<String>,
}

fn default_use_exclusions() -> bool {
    true
}

impl RunConfig {
    pub fn source_table<'a>(&'a self, collection: &'a CollectionConfig) -> &'a str {
        self.all_ids_of
            .as_deref()
            .or(self.table.as_deref())
            .unwrap_or(&collection.table)
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl SessionConfig {
    pub fn from_toml(input: &str) -> Result<Self, ClassifyError> {
        let config: SessionConfig =
            toml::from_str(input).map_err(|e| ClassifyError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ClassifyError> {
        if self.collections.is_empty() {
            return Err(ClassifyError::ConfigValidation(
                "at least one collection is required".into(),
            ));
        }

        for (set_name, set) in &self.term_sets {
            if let Some(ref name) = set.builtin {
                if builtin(name).is_none() {
                    return Err(ClassifyError::UnknownBuiltin(format!(
                        "term set '{set_name}': '{name}'"
                    )));
                }
            }
        }

        let mut collection_names = BTreeSet::new();
        for coll in &self.collections {
            if !collection_names.insert(coll.name.as_str()) {
                return Err(ClassifyError::ConfigValidation(format!(
                    "collection '{}' is defined more than once",
                    coll.name
                )));
            }
            self.require_table(&coll.name, &coll.table)?;

            let mut labels = BTreeSet::new();
            for run in &coll.runs {
                if !labels.insert(run.label.as_str()) {
                    return Err(ClassifyError::DuplicateLabel {
                        collection: coll.name.clone(),
                        label: run.label.clone(),
                    });
                }
                self.validate_run(coll, run)?;
            }
        }

        Ok(())
    }

    fn validate_run(&self, coll: &CollectionConfig, run: &RunConfig) -> Result<(), ClassifyError> {
        let context = format!("collection '{}', run '{}'", coll.name, run.label);
        match (&run.terms, &run.all_ids_of) {
            (Some(terms), None) => {
                if !self.term_sets.contains_key(terms) {
                    return Err(ClassifyError::UnknownTermSet(format!("{context}: '{terms}'")));
                }
                if run.method.is_none() {
                    return Err(ClassifyError::ConfigValidation(format!(
                        "{context}: 'method' is required with 'terms'"
                    )));
                }
                if let Some(ref table) = run.table {
                    self.require_table(&context, table)?;
                }
            }
            (None, Some(table)) => {
                if run.method.is_some() || run.table.is_some() {
                    return Err(ClassifyError::ConfigValidation(format!(
                        "{context}: 'all_ids_of' takes no 'method' or 'table'"
                    )));
                }
                self.require_table(&context, table)?;
            }
            _ => {
                return Err(ClassifyError::ConfigValidation(format!(
                    "{context}: exactly one of 'terms' or 'all_ids_of' is required"
                )));
            }
        }
        Ok(())
    }

    fn require_table(&self, context: &str, table: &str) -> Result<(), ClassifyError> {
        if self.tables.contains_key(table) {
            Ok(())
        } else {
            Err(ClassifyError::UnknownTable(format!("{context}: '{table}'")))
        }
    }

    /// Every term file referenced by any term set.
    pub fn term_files(&self) -> BTreeSet<&str> {
        self.term_sets.values().flat_map(|s| s.file_refs()).collect()
    }

    /// Build the concrete term sets. `files` maps each path from
    /// [`term_files`](Self::term_files) to its contents.
    pub fn resolve_term_sets(
        &self,
        files: &HashMap<String, String>,
    ) -> Result<BTreeMap<String, TermSets>, ClassifyError> {
        let read = |path: &Option<String>| -> Result<Vec<String>, ClassifyError> {
            match path {
                Some(p) => files
                    .get(p)
                    .map(|data| parse_term_lines(data))
                    .ok_or_else(|| ClassifyError::Io(format!("term file '{p}' was not loaded"))),
                None => Ok(Vec::new()),
            }
        };

        let mut resolved = BTreeMap::new();
        for (name, set) in &self.term_sets {
            let mut terms = match set.builtin {
                Some(ref b) => builtin(b).ok_or_else(|| ClassifyError::UnknownBuiltin(b.clone()))?,
                None => TermSets::new(name.as_str(), &[], &[]),
            };
            terms.name = name.clone();
            terms.include.extend(set.include.iter().cloned());
            terms.exclude.extend(set.exclude.iter().cloned());
            terms.include.extend(read(&set.include_file)?);
            terms.exclude.extend(read(&set.exclude_file)?);
            resolved.insert(name.clone(), terms);
        }
        Ok(resolved)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
