//! `meddebt-classify` — Term-list classification of medical debt plaintiffs.
//!
//! Pure engine crate: receives pre-loaded case tables, returns per-strategy
//! case identifier sets, overlap reports and labeled tables.
//! No CLI dependencies; CSV helpers operate on in-memory strings.

pub mod aggregate;
pub mod annotate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod table;
pub mod terms;

pub use config::SessionConfig;
pub use engine::{run, SessionInput};
pub use error::ClassifyError;
pub use matcher::{exact_match, fuzzy_match, MatchMethod, Matcher};
pub use model::{CaseTable, FieldValue, MatchResult, ResultCollection, SessionResult, TermSets};
