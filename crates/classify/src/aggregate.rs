use std::collections::BTreeSet;
use std::fmt;

use crate::model::{ComparisonReport, LabelComparison, Overlap, ResultCollection};

/// Identifiers present in both sets.
pub fn overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    a.intersection(b).cloned().collect()
}

pub fn overlap_count(a: &BTreeSet<String>, b: &BTreeSet<String>) -> usize {
    // Walk the smaller set; intersection size is symmetric either way.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|id| large.contains(*id)).count()
}

/// All-pairs comparison over the labels of one collection, self included.
pub fn compare(collection: &ResultCollection) -> ComparisonReport {
    let labels = collection
        .entries
        .iter()
        .map(|entry| LabelComparison {
            label: entry.label.clone(),
            count: entry.len(),
            overlaps: collection
                .entries
                .iter()
                .map(|other| Overlap {
                    other: other.label.clone(),
                    count: overlap_count(&entry.ids, &other.ids),
                })
                .collect(),
        })
        .collect();

    ComparisonReport {
        collection: collection.name.clone(),
        labels,
    }
}

impl ComparisonReport {
    /// Overlap count between two labels, if both are present.
    pub fn overlap_between(&self, a: &str, b: &str) -> Option<usize> {
        self.labels
            .iter()
            .find(|l| l.label == a)?
            .overlaps
            .iter()
            .find(|o| o.other == b)
            .map(|o| o.count)
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.labels {
            writeln!(f, "-------------")?;
            writeln!(f, "{} # of Cases: {}", entry.label, entry.count)?;
            writeln!(f, ">")?;
            for o in &entry.overlaps {
                writeln!(f, ">>> {} & {} Overlap: {}", entry.label, o.other, o.count)?;
            }
            writeln!(f, ">")?;
        }
        Ok(())
    }
}
