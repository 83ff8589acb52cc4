//! Sources of annotate (blame) data.
//!
//! The remapper only needs, for a revision and a path, the list of
//! [`ProvenanceRecord`]s of that file. Where they come from is up to the
//! caller; two sources are provided here.
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CovmapError, Result};
use crate::model::ProvenanceRecord;

/// A source of per-line annotate data.
pub trait ProvenanceProvider {
    /// Annotate `path` at `revision`.
    ///
    /// `Ok(None)` means the file does not exist at that revision.
    fn get_provenance(&self, revision: &str, path: &str) -> Result<Option<Vec<ProvenanceRecord>>>;
}

/// Annotate data held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticProvenance {
    files: HashMap<(String, String), Vec<ProvenanceRecord>>,
}

impl StaticProvenance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, revision: &str, path: &str, records: Vec<ProvenanceRecord>) {
        self.files
            .insert((revision.to_string(), path.to_string()), records);
    }
}

impl ProvenanceProvider for StaticProvenance {
    fn get_provenance(&self, revision: &str, path: &str) -> Result<Option<Vec<ProvenanceRecord>>> {
        Ok(self
            .files
            .get(&(revision.to_string(), path.to_string()))
            .cloned())
    }
}

/// Either a raw `json-annotate` response or a bare record list.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotateDump {
    Response { annotate: Vec<ProvenanceRecord> },
    Records(Vec<ProvenanceRecord>),
}

/// Annotate dumps stored on disk as `<root>/<revision>/<path>.json`.
#[derive(Debug, Clone)]
pub struct DirProvenance {
    root: PathBuf,
}

impl DirProvenance {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn outside_root(&self, what: &str) -> CovmapError {
        CovmapError::Provider(format!(
            "refusing to read annotate data outside of {}: {what}",
            self.root.display()
        ))
    }

    /// `<root>/<revision>/<path>.json`. The revision must be a single plain
    /// segment and the path must name at least one segment, none of them `..`.
    fn dump_path(&self, revision: &str, path: &str) -> Result<PathBuf> {
        if !is_plain_segment(revision) {
            return Err(self.outside_root(revision));
        }
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.is_empty() {
            return Err(CovmapError::Provider("empty annotate path".to_string()));
        }
        if !parts.iter().all(|part| is_plain_segment(part)) {
            return Err(self.outside_root(path));
        }

        let mut out = self.root.join(revision);
        out.extend(&parts);
        let mut file_name = out.file_name().unwrap_or_default().to_os_string();
        file_name.push(".json");
        out.set_file_name(file_name);
        Ok(out)
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
        && !Path::new(segment).is_absolute()
}

impl ProvenanceProvider for DirProvenance {
    fn get_provenance(&self, revision: &str, path: &str) -> Result<Option<Vec<ProvenanceRecord>>> {
        let dump = self.dump_path(revision, path)?;
        let content = match std::fs::read(&dump) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let parsed: AnnotateDump = serde_json::from_slice(&content).map_err(|e| {
            CovmapError::Provider(format!("invalid annotate data in {}: {e}", dump.display()))
        })?;
        let records = match parsed {
            AnnotateDump::Response { annotate } => annotate,
            AnnotateDump::Records(records) => records,
        };
        Ok(Some(records))
    }
}
