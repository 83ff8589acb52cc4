use covmap::model::{Changeset, ProvenanceRecord};

/// Annotate records for consecutive lines starting at line 1.
pub fn annotate(lines: &[(&str, u32)]) -> Vec<ProvenanceRecord> {
    lines
        .iter()
        .enumerate()
        .map(|(i, (rev, line))| ProvenanceRecord::new(i as u32 + 1, *rev, *line))
        .collect()
}

/// A changeset whose message references review request `D{id}`.
pub fn changeset(node: &str, id: u64, files: &[&str]) -> Changeset {
    Changeset {
        node: node.to_string(),
        desc: format!(
            "Commit {node}\n\nDifferential Revision: https://phabricator.services.mozilla.com/D{id}"
        ),
        files: files.iter().map(|f| f.to_string()).collect(),
    }
}
