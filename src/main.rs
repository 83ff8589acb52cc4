use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use covmap::cli::{self, GenerateArgs, OutputFormat};

/// covmap — Remap build coverage onto the revisions of a review stack.
#[derive(Parser)]
#[command(name = "covmap", version, about)]
struct Cli {
    /// Path to the covdir JSON report collected at the build revision.
    #[arg(long, global = true, default_value = "covdir.json")]
    report: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-file coverage for every revision of a stack.
    Generate {
        /// JSON list of changesets (`node`, `desc`, `files`).
        #[arg(long)]
        changesets: PathBuf,

        /// Directory of annotate dumps laid out as <revision>/<path>.json.
        #[arg(long)]
        annotate_dir: PathBuf,

        /// Revision the coverage report was collected at.
        #[arg(long)]
        build_revision: String,

        /// Third-party path list, one prefix per line.
        #[arg(long)]
        third_party: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Show the build-revision classification of one file.
    Lookup {
        /// Path of the file in the report.
        path: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Generate {
            changesets,
            annotate_dir,
            build_revision,
            third_party,
            output_format,
        } => cli::cmd_generate(&GenerateArgs {
            report: &cli.report,
            changesets: &changesets,
            annotate_dir: &annotate_dir,
            build_revision: &build_revision,
            third_party: third_party.as_deref(),
            output_format,
        })?,
        Commands::Lookup { path } => cli::cmd_lookup(&cli.report, &path)?,
    };

    print!("{output}");
    Ok(())
}
