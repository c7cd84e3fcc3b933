use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::ClassifyError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single cell. Only `Text` is ever eligible for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Missing,
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Missing => Ok(()),
        }
    }
}

/// One row, positionally aligned with `CaseTable::columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRecord {
    pub values: Vec<FieldValue>,
}

impl CaseRecord {
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }

    /// Value at `idx`, `Missing` for short rows.
    pub fn get(&self, idx: usize) -> &FieldValue {
        static MISSING: FieldValue = FieldValue::Missing;
        self.values.get(idx).unwrap_or(&MISSING)
    }
}

/// Ordered collection of case records with named columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<CaseRecord>,
}

impl CaseTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, values: Vec<FieldValue>) {
        self.rows.push(CaseRecord::new(values));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Resolve a column up front so a scan never fails part-way through.
    pub fn require_column(&self, name: &str) -> Result<usize, ClassifyError> {
        self.column_index(name)
            .ok_or_else(|| ClassifyError::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }
}

/// Which columns of a table carry the identifier and the plaintiff name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumns {
    pub id_column: String,
    pub text_column: String,
}

impl Default for TableColumns {
    fn default() -> Self {
        Self {
            id_column: "case_num".into(),
            text_column: "plaintiff".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Term sets
// ---------------------------------------------------------------------------

/// Inclusion and exclusion terms for one classification scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermSets {
    pub name: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl TermSets {
    pub fn new(name: impl Into<String>, include: &[&str], exclude: &[&str]) -> Self {
        Self {
            name: name.into(),
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Case identifiers selected by one (term sets, method) combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub label: String,
    pub source_table: String,
    pub ids: BTreeSet<String>,
}

impl MatchResult {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

/// Label → result mapping for one table context. Insertion ordered.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultCollection {
    pub name: String,
    pub entries: Vec<MatchResult>,
}

impl ResultCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, result: MatchResult) -> Result<(), ClassifyError> {
        if self.get(&result.label).is_some() {
            return Err(ClassifyError::DuplicateLabel {
                collection: self.name.clone(),
                label: result.label,
            });
        }
        self.entries.push(result);
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<&MatchResult> {
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Comparison report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlap {
    pub other: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelComparison {
    pub label: String,
    pub count: usize,
    pub overlaps: Vec<Overlap>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    pub collection: String,
    pub labels: Vec<LabelComparison>,
}

// ---------------------------------------------------------------------------
// Session output
// ---------------------------------------------------------------------------

/// A run that could not be completed. Other runs still proceed.
#[derive(Debug, Clone, Serialize)]
pub struct RunFailure {
    pub label: String,
    pub error: String,
}

/// Identifiers seen more than once in a table.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateIds {
    pub table: String,
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionOutcome {
    pub name: String,
    pub table: String,
    pub results: ResultCollection,
    pub report: ComparisonReport,
    pub failures: Vec<RunFailure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub duplicate_ids: Vec<DuplicateIds>,
    #[serde(skip)]
    pub labeled: Option<CaseTable>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResult {
    pub meta: SessionMeta,
    pub collections: Vec<CollectionOutcome>,
}

impl SessionResult {
    pub fn failure_count(&self) -> usize {
        self.collections.iter().map(|c| c.failures.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}
