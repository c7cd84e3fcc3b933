use serde::{Deserialize, Serialize};

use crate::model::FieldValue;

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Fuzzy,
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

impl std::str::FromStr for MatchMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Self::Exact),
            "fuzzy" => Ok(Self::Fuzzy),
            other => Err(format!("unknown match method \"{other}\" (expected \"exact\" or \"fuzzy\")")),
        }
    }
}

// ---------------------------------------------------------------------------
// Exact
// ---------------------------------------------------------------------------

/// Literal, case-sensitive substring containment.
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl ExactMatcher {
    pub fn new(include: &[String], exclude: &[String]) -> Self {
        Self {
            include: include.to_vec(),
            exclude: exclude.to_vec(),
        }
    }

    pub fn matches_text(&self, text: &str) -> bool {
        self.include.iter().any(|t| text.contains(t.as_str()))
            && !self.exclude.iter().any(|t| text.contains(t.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Fuzzy
// ---------------------------------------------------------------------------

/// Edit budget for a term of `len` characters: `floor(len * 0.05) + 1`.
pub fn max_edits_for(len: usize) -> usize {
    len / 20 + 1
}

/// A term compiled for approximate substring search.
///
/// The term is found when some contiguous region of the text is within
/// `max_edits` insertions, deletions or substitutions of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyPattern {
    chars: Vec<char>,
    max_edits: usize,
}

impl FuzzyPattern {
    pub fn new(term: &str) -> Self {
        let chars: Vec<char> = term.chars().collect();
        let max_edits = max_edits_for(chars.len());
        Self { chars, max_edits }
    }

    pub fn max_edits(&self) -> usize {
        self.max_edits
    }

    /// Smallest edit distance between the term and any substring of `text`.
    pub fn best_distance(&self, text: &str) -> usize {
        let m = self.chars.len();
        let mut col: Vec<usize> = (0..=m).collect();
        let mut best = col[m];
        for tc in text.chars() {
            // col[0] stays 0: a match may start anywhere in the text.
            let mut diag = col[0];
            for i in 1..=m {
                let cost = usize::from(self.chars[i - 1] != tc);
                let next = (diag + cost).min(col[i] + 1).min(col[i - 1] + 1);
                diag = col[i];
                col[i] = next;
            }
            best = best.min(col[m]);
        }
        best
    }

    /// Same as `best_distance(text) <= max_edits`, with early exit.
    pub fn is_found_in(&self, text: &str) -> bool {
        let m = self.chars.len();
        if m <= self.max_edits {
            return true;
        }
        let mut col: Vec<usize> = (0..=m).collect();
        for tc in text.chars() {
            let mut diag = col[0];
            for i in 1..=m {
                let cost = usize::from(self.chars[i - 1] != tc);
                let next = (diag + cost).min(col[i] + 1).min(col[i - 1] + 1);
                diag = col[i];
                col[i] = next;
            }
            if col[m] <= self.max_edits {
                return true;
            }
        }
        false
    }
}

/// Error-tolerant substring containment with per-term edit budgets.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    include: Vec<FuzzyPattern>,
    exclude: Vec<FuzzyPattern>,
}

impl FuzzyMatcher {
    pub fn new(include: &[String], exclude: &[String]) -> Self {
        Self {
            include: include.iter().map(|t| FuzzyPattern::new(t)).collect(),
            exclude: exclude.iter().map(|t| FuzzyPattern::new(t)).collect(),
        }
    }

    pub fn matches_text(&self, text: &str) -> bool {
        self.include.iter().any(|p| p.is_found_in(text))
            && !self.exclude.iter().any(|p| p.is_found_in(text))
    }
}

// ---------------------------------------------------------------------------
// Compiled matcher
// ---------------------------------------------------------------------------

/// Term sets compiled once for a method, reused across every row.
#[derive(Debug, Clone)]
pub enum Matcher {
    Exact(ExactMatcher),
    Fuzzy(FuzzyMatcher),
}

impl Matcher {
    pub fn compile(method: MatchMethod, include: &[String], exclude: &[String]) -> Self {
        match method {
            MatchMethod::Exact => Self::Exact(ExactMatcher::new(include, exclude)),
            MatchMethod::Fuzzy => Self::Fuzzy(FuzzyMatcher::new(include, exclude)),
        }
    }

    pub fn method(&self) -> MatchMethod {
        match self {
            Self::Exact(_) => MatchMethod::Exact,
            Self::Fuzzy(_) => MatchMethod::Fuzzy,
        }
    }

    /// Non-text values never match.
    pub fn matches(&self, value: &FieldValue) -> bool {
        let Some(text) = value.as_text() else {
            return false;
        };
        match self {
            Self::Exact(m) => m.matches_text(text),
            Self::Fuzzy(m) => m.matches_text(text),
        }
    }
}

/// One-shot exact predicate.
pub fn exact_match(value: &FieldValue, include: &[String], exclude: &[String]) -> bool {
    Matcher::compile(MatchMethod::Exact, include, exclude).matches(value)
}

/// One-shot fuzzy predicate.
pub fn fuzzy_match(value: &FieldValue, include: &[String], exclude: &[String]) -> bool {
    Matcher::compile(MatchMethod::Fuzzy, include, exclude).matches(value)
}

/// The terms from `terms` that `method` finds in `text`, in list order.
pub fn term_hits<'a>(method: MatchMethod, text: &str, terms: &'a [String]) -> Vec<&'a str> {
    terms
        .iter()
        .filter(|t| match method {
            MatchMethod::Exact => text.contains(t.as_str()),
            MatchMethod::Fuzzy => FuzzyPattern::new(t).is_found_in(text),
        })
        .map(String::as_str)
        .collect()
}
