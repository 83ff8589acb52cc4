//! Data shared by the locator, the remapper and the aggregator: annotate
//! records, the origin key used to join them, per-line classifications and
//! the per-revision results handed back to callers.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Compute a coverage rate, returning 0.0 when the total is zero.
#[must_use]
pub fn rate(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64
    }
}

/// One line of a file as annotated (blamed) at a specific revision.
///
/// Field names on the wire follow the hg `json-annotate` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    /// 1-based line number in the file at the annotated revision.
    #[serde(rename = "lineno")]
    pub line_at_revision: u32,
    /// Revision that introduced this line's content.
    #[serde(rename = "node")]
    pub origin_revision: String,
    /// 1-based line number the line had when it was introduced.
    #[serde(rename = "targetline")]
    pub origin_line: u32,
}

impl ProvenanceRecord {
    pub fn new(line_at_revision: u32, origin_revision: impl Into<String>, origin_line: u32) -> Self {
        Self {
            line_at_revision,
            origin_revision: origin_revision.into(),
            origin_line,
        }
    }

    #[must_use]
    pub fn origin_key(&self) -> OriginKey {
        OriginKey {
            revision: self.origin_revision.clone(),
            line: self.origin_line,
        }
    }
}

/// Identity of a logical line across history: the revision that introduced
/// it and its line number at that time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OriginKey {
    pub revision: String,
    pub line: u32,
}

/// Coverage state of a single line at a target revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    /// Not executable.
    NotExecutable,
    /// Executed at least once.
    Covered,
    /// Executable but never executed.
    Uncovered,
    /// The line does not exist at the build revision.
    Unknown,
}

impl LineStatus {
    /// Classify a raw covdir count.
    #[must_use]
    pub fn from_count(count: i64) -> Self {
        if count == -1 {
            LineStatus::NotExecutable
        } else if count > 0 {
            LineStatus::Covered
        } else {
            LineStatus::Uncovered
        }
    }

    pub fn as_char(self) -> char {
        match self {
            LineStatus::NotExecutable => 'N',
            LineStatus::Covered => 'C',
            LineStatus::Uncovered => 'U',
            LineStatus::Unknown => 'X',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'N' => Some(LineStatus::NotExecutable),
            'C' => Some(LineStatus::Covered),
            'U' => Some(LineStatus::Uncovered),
            'X' => Some(LineStatus::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A revision to process, as listed by the revision enumerator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    /// Revision identifier (commit hash).
    pub node: String,
    /// Full commit message.
    pub desc: String,
    /// Paths modified by this revision.
    #[serde(default)]
    pub files: Vec<String>,
}

/// Remapped coverage for one file at one revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCoverage {
    /// Lines added by the revision, excluding non-executable ones.
    pub lines_added: u64,
    /// Added lines whose coverage could not be mapped from the build.
    pub lines_unknown: u64,
    /// Added lines that were executed.
    pub lines_covered: u64,
    /// One `N`/`C`/`U`/`X` character per line of the file.
    pub coverage: String,
}

impl PathCoverage {
    /// Iterate the classification string as typed statuses.
    pub fn statuses(&self) -> impl Iterator<Item = LineStatus> + '_ {
        self.coverage.chars().filter_map(LineStatus::from_char)
    }
}

/// Result for one processed revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionResult {
    /// Review-request identifier parsed from the commit message.
    pub revision_id: u64,
    /// Review-request URL. Kept out of the serialized result, which only
    /// carries what the review system is sent.
    #[serde(skip)]
    pub url: String,
    /// Per-file coverage, in the order the revision lists its files.
    pub paths: IndexMap<String, PathCoverage>,
}

impl RevisionResult {
    pub fn new(revision_id: u64, url: impl Into<String>) -> Self {
        Self {
            revision_id,
            url: url.into(),
            paths: IndexMap::new(),
        }
    }

    /// Only the classification strings, keyed by path. This is the payload a
    /// review system receives; the counts stay local.
    #[must_use]
    pub fn coverage_by_path(&self) -> IndexMap<&str, &str> {
        self.paths
            .iter()
            .map(|(path, cov)| (path.as_str(), cov.coverage.as_str()))
            .collect()
    }

    #[must_use]
    pub fn lines_added(&self) -> u64 {
        self.paths.values().map(|p| p.lines_added).sum()
    }

    #[must_use]
    pub fn lines_covered(&self) -> u64 {
        self.paths.values().map(|p| p.lines_covered).sum()
    }

    #[must_use]
    pub fn lines_unknown(&self) -> u64 {
        self.paths.values().map(|p| p.lines_unknown).sum()
    }

    /// Share of added lines that are covered.
    #[must_use]
    pub fn rate(&self) -> f64 {
        rate(self.lines_covered(), self.lines_added())
    }
}

/// All revision results of a batch, keyed by revision node, in stack order.
pub type BatchResults = IndexMap<String, RevisionResult>;
