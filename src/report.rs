//! Output formatting for remapped coverage results.

use std::fmt::Write;

use crate::model::{BatchResults, LineStatus, PathCoverage};

/// Trait for formatting batch results.
pub trait ReportFormatter {
    /// Format the results to a string.
    fn format(&self, results: &BatchResults) -> String;
}

/// Plain text formatter.
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, results: &BatchResults) -> String {
        let mut out = String::new();

        if results.is_empty() {
            out.push_str("No revisions with a review request.\n");
            return out;
        }

        for (node, result) in results {
            let short = node.get(..12).unwrap_or(node.as_str());
            let id = result.revision_id;
            let covered = result.lines_covered();
            let added = result.lines_added();
            let unknown = result.lines_unknown();
            let pct = result.rate() * 100.0;
            writeln!(
                out,
                "D{id} ({short}): {covered}/{added} added lines covered ({pct:.1}%), {unknown} unknown"
            )
            .unwrap();
            if !result.url.is_empty() {
                writeln!(out, "  {}", result.url).unwrap();
            }

            for (path, cov) in &result.paths {
                let lines = cov.coverage.len();
                write!(
                    out,
                    "  {path}  {}/{} covered, {} unknown, {lines} lines",
                    cov.lines_covered, cov.lines_added, cov.lines_unknown
                )
                .unwrap();
                let uncovered = lines_with_status(cov, LineStatus::Uncovered);
                if !uncovered.is_empty() {
                    write!(out, "  uncovered: {}", format_line_ranges(&uncovered)).unwrap();
                }
                out.push('\n');
            }
        }

        out
    }
}

/// JSON formatter, emitting the results keyed by revision node.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, results: &BatchResults) -> String {
        let mut out =
            serde_json::to_string_pretty(results).expect("string-keyed results always serialize");
        out.push('\n');
        out
    }
}

/// 1-based line numbers of the file carrying `status`.
#[must_use]
pub fn lines_with_status(coverage: &PathCoverage, status: LineStatus) -> Vec<u32> {
    coverage
        .statuses()
        .zip(1u32..)
        .filter(|(s, _)| *s == status)
        .map(|(_, line)| line)
        .collect()
}

/// Coalesce sorted line numbers into `(start, end)` ranges of consecutive lines.
#[must_use]
pub fn coalesce_ranges(lines: &[u32]) -> Vec<(u32, u32)> {
    let Some((&first, rest)) = lines.split_first() else {
        return Vec::new();
    };

    debug_assert!(
        lines.windows(2).all(|w| w[0] < w[1]),
        "coalesce_ranges requires sorted, deduplicated input"
    );

    let mut ranges = Vec::new();
    let mut start = first;
    let mut end = first;
    for &line in rest {
        if line == end + 1 {
            end = line;
        } else {
            ranges.push((start, end));
            start = line;
            end = line;
        }
    }
    ranges.push((start, end));
    ranges
}

/// Format line numbers into compact range notation, e.g. "1, 3-5, 8".
#[must_use]
pub fn format_line_ranges(lines: &[u32]) -> String {
    coalesce_ranges(lines)
        .iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RevisionResult;

    fn results() -> BatchResults {
        let mut result = RevisionResult::new(42, "https://phabricator.services.mozilla.com/D42");
        result.paths.insert(
            "dom/Node.cpp".to_string(),
            PathCoverage {
                lines_added: 4,
                lines_unknown: 1,
                lines_covered: 2,
                coverage: "NCCUUXN".to_string(),
            },
        );
        let mut results = BatchResults::new();
        results.insert("0123456789abcdef".to_string(), result);
        results
    }

    #[test]
    fn test_coalesce_ranges() {
        assert_eq!(coalesce_ranges(&[]), Vec::<(u32, u32)>::new());
        assert_eq!(coalesce_ranges(&[5]), vec![(5, 5)]);
        assert_eq!(coalesce_ranges(&[1, 2, 3, 7, 9, 10]), vec![(1, 3), (7, 7), (9, 10)]);
    }

    #[test]
    fn test_format_line_ranges() {
        assert_eq!(format_line_ranges(&[]), "");
        assert_eq!(format_line_ranges(&[1, 3, 4, 5, 10]), "1, 3-5, 10");
    }

    #[test]
    fn test_lines_with_status() {
        let results = results();
        let cov = &results["0123456789abcdef"].paths["dom/Node.cpp"];
        assert_eq!(lines_with_status(cov, LineStatus::Uncovered), vec![4, 5]);
        assert_eq!(lines_with_status(cov, LineStatus::NotExecutable), vec![1, 7]);
        assert_eq!(lines_with_status(cov, LineStatus::Unknown), vec![6]);
    }

    #[test]
    fn test_format_text() {
        let out = TextFormatter.format(&results());
        assert!(out.contains(
            "D42 (0123456789ab): 2/4 added lines covered (50.0%), 1 unknown\n  \
             https://phabricator.services.mozilla.com/D42\n"
        ));
        assert!(out.contains("dom/Node.cpp  2/4 covered, 1 unknown, 7 lines  uncovered: 4-5"));
    }

    #[test]
    fn test_format_text_keeps_stack_order() {
        let mut results = BatchResults::new();
        for (node, id) in [("ffff", 1), ("0000", 2)] {
            let mut result = RevisionResult::new(id, "");
            for path in ["z.c", "a.c"] {
                result.paths.insert(
                    path.to_string(),
                    PathCoverage {
                        lines_added: 1,
                        lines_unknown: 0,
                        lines_covered: 1,
                        coverage: "C".to_string(),
                    },
                );
            }
            results.insert(node.to_string(), result);
        }

        let out = TextFormatter.format(&results);
        assert!(out.find("D1 (ffff)").unwrap() < out.find("D2 (0000)").unwrap());
        assert!(out.find("z.c").unwrap() < out.find("a.c").unwrap());

        let json = JsonFormatter.format(&results);
        assert!(json.find("\"ffff\"").unwrap() < json.find("\"0000\"").unwrap());
        assert!(json.find("\"z.c\"").unwrap() < json.find("\"a.c\"").unwrap());
    }

    #[test]
    fn test_format_text_empty() {
        let out = TextFormatter.format(&BatchResults::new());
        assert_eq!(out, "No revisions with a review request.\n");
    }

    #[test]
    fn test_format_json() {
        let out = JsonFormatter.format(&results());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["0123456789abcdef"]["revision_id"], 42);
        assert_eq!(
            value["0123456789abcdef"]["paths"]["dom/Node.cpp"]["coverage"],
            "NCCUUXN"
        );
    }
}
