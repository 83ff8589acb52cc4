//! Remapping of build-revision coverage onto another revision.
//!
//! Line numbers drift as intermediate revisions insert and delete lines, so
//! they cannot be used to carry coverage between revisions. Annotate data
//! gives each line a stable identity instead: the revision that introduced
//! it and its line number at that point. When two annotate listings share an
//! [`OriginKey`] they are talking about the same line.
use std::collections::HashMap;

use crate::model::{LineStatus, OriginKey, ProvenanceRecord};

/// Raw build-revision counts keyed by line identity.
#[derive(Debug, Clone, Default)]
pub struct CoverageMap {
    counts: HashMap<OriginKey, i64>,
}

impl CoverageMap {
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, key: &OriginKey) -> Option<i64> {
        self.counts.get(key).copied()
    }

    /// Classify a single line of another revision.
    pub fn status(&self, record: &ProvenanceRecord) -> LineStatus {
        match self.get(&record.origin_key()) {
            Some(count) => LineStatus::from_count(count),
            None => LineStatus::Unknown,
        }
    }
}

/// Key the build revision's counts by line identity.
///
/// Annotate lines are 1-based, covdir indices 0-based. Records pointing
/// past the end of `coverage` are dropped: the two sources can disagree on
/// the file length (trailing lines, generated content) and a partial map is
/// still useful.
pub fn build_map(build_provenance: &[ProvenanceRecord], coverage: &[i64]) -> CoverageMap {
    let mut counts = HashMap::with_capacity(build_provenance.len());
    for record in build_provenance {
        let Some(lineno) = (record.line_at_revision as usize).checked_sub(1) else {
            continue;
        };
        if let Some(&count) = coverage.get(lineno) {
            counts.insert(record.origin_key(), count);
        }
    }
    CoverageMap { counts }
}

/// Classify every line of a revision, in annotate order.
///
/// The result has exactly one character per record. Lines whose identity is
/// not in `map` were rewritten by a revision the build did not include and
/// come out as `X`.
pub fn apply_map(target_provenance: &[ProvenanceRecord], map: &CoverageMap) -> String {
    target_provenance
        .iter()
        .map(|record| map.status(record).as_char())
        .collect()
}
