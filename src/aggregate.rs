//! Per-revision, per-file remapping of a build's coverage.
use log::{debug, info, warn};

use crate::covdir::CovdirReport;
use crate::error::{CovmapError, Result};
use crate::filter::{MissReason, PathFilter};
use crate::model::{BatchResults, Changeset, LineStatus, PathCoverage, RevisionResult};
use crate::provenance::ProvenanceProvider;
use crate::remap::{apply_map, build_map};
use crate::revision::parse_review_request;

/// Remaps the coverage of one build revision onto the revisions of a stack.
pub struct Aggregator<'a, P: ProvenanceProvider> {
    /// Revision the coverage report was collected at.
    build_revision: &'a str,
    provider: &'a P,
    filter: &'a PathFilter,
}

impl<'a, P: ProvenanceProvider> Aggregator<'a, P> {
    pub fn new(build_revision: &'a str, provider: &'a P, filter: &'a PathFilter) -> Self {
        Self {
            build_revision,
            provider,
            filter,
        }
    }

    /// Compute coverage for every file changed by every revision in
    /// `changesets` that references a review request.
    ///
    /// Results keep the order of `changesets` and of each revision's files.
    ///
    /// Fails as a whole with [`CovmapError::MissingBuildProvenance`] when a
    /// file has coverage but no annotate data at the build revision.
    pub fn process(&self, report: &CovdirReport, changesets: &[Changeset]) -> Result<BatchResults> {
        let mut results = BatchResults::new();

        for changeset in changesets {
            let Some(request) = parse_review_request(&changeset.desc) else {
                debug!("No review request in {}, skipping", changeset.node);
                continue;
            };

            let mut result = RevisionResult::new(request.id, request.url);
            for path in &changeset.files {
                if let Some(coverage) = self.process_path(report, &changeset.node, path)? {
                    result.paths.insert(path.clone(), coverage);
                }
            }
            results.insert(changeset.node.clone(), result);
        }

        Ok(results)
    }

    /// Coverage of `path` at `revision`, or `None` when there is nothing to
    /// report for it.
    pub fn process_path(
        &self,
        report: &CovdirReport,
        revision: &str,
        path: &str,
    ) -> Result<Option<PathCoverage>> {
        let Some(raw) = report.find_coverage(path) else {
            self.log_miss(path);
            return Ok(None);
        };

        // Files deleted at the build revision have no coverage either, so
        // reaching this point without annotate data means the report and
        // the repository disagree.
        let build_provenance = self
            .provider
            .get_provenance(self.build_revision, path)?
            .ok_or_else(|| CovmapError::MissingBuildProvenance {
                revision: self.build_revision.to_string(),
                path: path.to_string(),
            })?;

        let Some(target_provenance) = self.provider.get_provenance(revision, path)? else {
            debug!("{path} does not exist at {revision}, skipping");
            return Ok(None);
        };

        let added: Vec<usize> = target_provenance
            .iter()
            .filter(|record| record.origin_revision == revision)
            .filter_map(|record| (record.line_at_revision as usize).checked_sub(1))
            .collect();

        let map = build_map(&build_provenance, raw);
        let coverage = apply_map(&target_provenance, &map);

        Ok(Some(summarize(coverage, &added)))
    }

    fn log_miss(&self, path: &str) {
        match self.filter.classify_miss(path) {
            MissReason::ThirdParty => info!("Path not found in report for third party: {path}"),
            MissReason::UnsupportedExtension => {
                info!("Path not found in report for unsupported extension: {path}")
            }
            MissReason::Unexpected => warn!("Path not found in report: {path}"),
        }
    }
}

/// Count the added lines by status. Indices past the end of the
/// classification are ignored.
fn summarize(coverage: String, added: &[usize]) -> PathCoverage {
    let statuses: Vec<LineStatus> = coverage.chars().filter_map(LineStatus::from_char).collect();

    let mut lines_added = 0;
    let mut lines_unknown = 0;
    let mut lines_covered = 0;
    for status in added.iter().filter_map(|&i| statuses.get(i)) {
        match status {
            LineStatus::NotExecutable => continue,
            LineStatus::Unknown => lines_unknown += 1,
            LineStatus::Covered => lines_covered += 1,
            LineStatus::Uncovered => {}
        }
        lines_added += 1;
    }

    PathCoverage {
        lines_added,
        lines_unknown,
        lines_covered,
        coverage,
    }
}
