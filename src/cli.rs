use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::import::{self, ImportOptions};
use crate::commands::thumbs::{self, ThumbsOptions};
use crate::commands::{CommandReport, status};

#[derive(Debug, Parser)]
#[command(
    name = "gpv",
    version,
    about = "Import chaptered GoPro recordings into single, timestamped videos"
)]
struct Cli {
    /// Emit the report as JSON instead of text lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import recordings from files or directories.
    Import {
        /// Files or directories to import.
        #[arg(required = true, value_name = "INFILE")]
        inputs: Vec<PathBuf>,

        /// Directory the imported files are written to.
        #[arg(short = 'o', long, value_name = "OUTDIR")]
        output_dir: Option<PathBuf>,

        /// Input filename mask, a regular expression.
        #[arg(short = 'm', long, value_name = "REGEXP")]
        mask: Option<String>,

        /// Inclusive range of recording identifiers, e.g. 0001-0002.
        #[arg(short = 'r', long, value_name = "N-N")]
        range: Option<String>,

        /// Re-encode instead of stream-copying.
        #[arg(long)]
        encode: bool,

        /// Constant rate factor for re-encodes (0-51).
        #[arg(long, value_name = "CRF")]
        crf: Option<u32>,

        /// Scale filter for re-encodes, e.g. 1280:-2.
        #[arg(long, value_name = "FILTER")]
        scale: Option<String>,

        /// Leave output modification times alone.
        #[arg(long)]
        no_timestamps: bool,

        /// Generate a thumbnail montage per imported recording.
        #[arg(long)]
        thumbs: bool,
    },
    /// Generate thumbnail montages for finished videos.
    Thumbs {
        /// Video files to thumbnail.
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<PathBuf>,
    },
    /// Report tool availability, paths, and active configuration.
    Status,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let report = match cli.command {
        Command::Import {
            inputs,
            output_dir,
            mask,
            range,
            encode,
            crf,
            scale,
            no_timestamps,
            thumbs,
        } => import::run(&ImportOptions {
            inputs,
            output_dir,
            mask,
            range,
            encode,
            crf,
            scale,
            no_timestamps,
            thumbs,
        })?,
        Command::Thumbs { inputs } => thumbs::run(&ThumbsOptions { inputs })?,
        Command::Status => status::run()?,
    };

    print_report(&report, cli.json)?;
    if !report.ok {
        std::process::exit(2);
    }
    Ok(())
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    for detail in &report.details {
        println!("{detail}");
    }
    for issue in &report.issues {
        println!("issue: {issue}");
    }
    println!("{}: {}", report.command, if report.ok { "ok" } else { "failed" });
    Ok(())
}
