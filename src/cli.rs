//! Command handler functions for the covmap CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::info;

use crate::aggregate::Aggregator;
use crate::covdir::CovdirReport;
use crate::filter::PathFilter;
use crate::model::{Changeset, LineStatus};
use crate::provenance::DirProvenance;
use crate::report::{JsonFormatter, ReportFormatter, TextFormatter};

/// Output format for the `generate` command.
#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Inputs of the `generate` command.
pub struct GenerateArgs<'a> {
    pub report: &'a Path,
    pub changesets: &'a Path,
    pub annotate_dir: &'a Path,
    pub build_revision: &'a str,
    pub third_party: Option<&'a Path>,
    pub output_format: OutputFormat,
}

pub fn load_changesets(path: &Path) -> Result<Vec<Changeset>> {
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read changesets from {}", path.display()))?;
    serde_json::from_slice(&content)
        .with_context(|| format!("Invalid changeset list in {}", path.display()))
}

pub fn cmd_generate(args: &GenerateArgs<'_>) -> Result<String> {
    let report = CovdirReport::from_path(args.report)
        .with_context(|| format!("Failed to load covdir report {}", args.report.display()))?;
    let changesets = load_changesets(args.changesets)?;
    let filter = match args.third_party {
        Some(list) => PathFilter::from_file(list)?,
        None => PathFilter::default(),
    };
    let provider = DirProvenance::new(args.annotate_dir);

    info!(
        "Remapping coverage of {} onto {} changesets",
        args.build_revision,
        changesets.len()
    );
    let results = Aggregator::new(args.build_revision, &provider, &filter)
        .process(&report, &changesets)
        .context("Failed to remap coverage")?;

    let output = match args.output_format {
        OutputFormat::Text => TextFormatter.format(&results),
        OutputFormat::Json => JsonFormatter.format(&results),
    };
    Ok(output)
}

/// Show the build-revision classification of a single file.
pub fn cmd_lookup(report: &Path, path: &str) -> Result<String> {
    let report = CovdirReport::from_path(report)
        .with_context(|| format!("Failed to load covdir report {}", report.display()))?;
    let coverage = report
        .find_coverage(path)
        .with_context(|| format!("No coverage data for '{path}'"))?;
    let mut out: String = coverage
        .iter()
        .map(|&c| LineStatus::from_count(c).as_char())
        .collect();
    out.push('\n');
    Ok(out)
}
