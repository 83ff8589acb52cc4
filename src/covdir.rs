//! Lookup of per-line coverage in a covdir report.
//!
//! A covdir report is a JSON tree that mirrors the source tree: directory
//! nodes carry `children` keyed by path segment, file nodes carry a
//! `coverage` array with one entry per source line (`-1` or `null` for
//! non-executable lines, otherwise the hit count).
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::Result;

/// One node of a covdir report. The root node is the whole report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CovdirReport {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: BTreeMap<String, CovdirReport>,
    #[serde(default, deserialize_with = "deserialize_coverage")]
    pub coverage: Option<Vec<i64>>,
}

/// `null` entries mean "no data" and are folded into the non-executable
/// marker so the rest of the crate only deals with integers.
fn deserialize_coverage<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<i64>>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|counts| counts.into_iter().map(|c| c.unwrap_or(-1)).collect()))
}

impl CovdirReport {
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Build a file node holding the given counts.
    pub fn file(name: &str, coverage: Vec<i64>) -> Self {
        Self {
            name: name.to_string(),
            children: BTreeMap::new(),
            coverage: Some(coverage),
        }
    }

    /// Insert a file node at `path`, creating intermediate directories.
    pub fn insert(&mut self, path: &str, coverage: Vec<i64>) {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((file_name, dirs)) = segments.split_last() else {
            return;
        };
        let mut node = self;
        for dir in dirs {
            node = node
                .children
                .entry((*dir).to_string())
                .or_insert_with(|| CovdirReport {
                    name: (*dir).to_string(),
                    ..Default::default()
                });
        }
        node.children
            .insert((*file_name).to_string(), CovdirReport::file(file_name, coverage));
    }

    /// Find the per-line coverage of the file at `path` (slash separated).
    ///
    /// Returns `None` when any segment is missing or the path names a
    /// directory. A miss is a normal outcome: generated, third-party and
    /// non-source files simply have no entry.
    pub fn find_coverage(&self, path: &str) -> Option<&[i64]> {
        let mut node = self;
        for part in path.split('/').filter(|s| !s.is_empty()) {
            node = node.children.get(part)?;
        }
        node.coverage.as_deref()
    }
}
