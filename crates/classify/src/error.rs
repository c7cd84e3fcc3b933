use std::fmt;

#[derive(Debug)]
pub enum ClassifyError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty session, ambiguous run, etc.).
    ConfigValidation(String),
    /// A run or collection references a table that is not configured or not loaded.
    UnknownTable(String),
    /// A run references a term set that is not configured.
    UnknownTermSet(String),
    /// A term set names a built-in list that does not exist.
    UnknownBuiltin(String),
    /// Missing required column in an input table.
    MissingColumn { table: String, column: String },
    /// Label already present in a result collection.
    DuplicateLabel { collection: String, label: String },
    /// Flag column would shadow an existing table column.
    ColumnConflict { table: String, column: String },
    /// CSV read / write error.
    Csv(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownTable(name) => write!(f, "unknown table: {name}"),
            Self::UnknownTermSet(name) => write!(f, "unknown term set: {name}"),
            Self::UnknownBuiltin(name) => write!(f, "unknown built-in term list: {name}"),
            Self::MissingColumn { table, column } => {
                write!(f, "table '{table}': missing column '{column}'")
            }
            Self::DuplicateLabel { collection, label } => {
                write!(f, "collection '{collection}': duplicate label '{label}'")
            }
            Self::ColumnConflict { table, column } => {
                write!(f, "table '{table}': flag column '{column}' already exists")
            }
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ClassifyError {}

impl From<csv::Error> for ClassifyError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}
