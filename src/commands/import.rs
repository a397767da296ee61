use anyhow::{Context, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::commands::CommandReport;
use crate::import::config::{self, ImportConfig};
use crate::import::paths::resolve_paths;
use crate::import::pipeline::{ImportPipeline, Outcome};
use crate::import::scan::{self, IdRange, ScanOptions};

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub inputs: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub mask: Option<String>,
    pub range: Option<String>,
    pub encode: bool,
    pub crf: Option<u32>,
    pub scale: Option<String>,
    pub no_timestamps: bool,
    pub thumbs: bool,
}

fn apply_cli_overrides(cfg: &mut ImportConfig, opts: &ImportOptions) {
    if opts.encode {
        cfg.assembly.encode = true;
    }
    if let Some(crf) = opts.crf {
        cfg.assembly.crf = crf;
    }
    if let Some(scale) = &opts.scale {
        cfg.assembly.scale = Some(scale.clone());
    }
    if opts.no_timestamps {
        cfg.assembly.keep_timestamps = false;
    }
    if opts.thumbs {
        cfg.thumbs.enabled = true;
    }
}

pub fn run(opts: &ImportOptions) -> Result<CommandReport> {
    let mut cfg = config::load_config()?;
    apply_cli_overrides(&mut cfg, opts);
    config::validate(&cfg)?;

    let paths = resolve_paths();
    let mut report = CommandReport::new("import");

    let output_dir = match opts.output_dir.clone().or_else(|| paths.output_dir.clone()) {
        Some(dir) => dir,
        None => env::current_dir().context("failed to resolve current directory")?,
    };
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    report.detail(format!("output_dir={}", output_dir.display()));

    let scan_opts = ScanOptions {
        mask: opts
            .mask
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("invalid --mask pattern")?,
        range: opts.range.as_deref().map(IdRange::parse).transpose()?,
        extensions: cfg.scan.extensions.clone(),
    };
    let candidates = scan::collect_candidates(&opts.inputs, &scan_opts)?;
    report.detail(format!("candidates={}", candidates.len()));
    if candidates.is_empty() {
        report.detail("nothing to import".to_string());
        return Ok(report);
    }

    let mut pipeline = ImportPipeline::new(&cfg, &paths, output_dir);
    report.detail(format!("ledger_ids={}", pipeline.ledger_len()));

    let mut imported = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;
    for candidate in &candidates {
        let recording_report = pipeline.import(candidate);
        match recording_report.outcome {
            Outcome::Imported => {
                imported += 1;
                report.detail(recording_report.summary());
            }
            Outcome::SkippedDuplicate => {
                skipped += 1;
                report.detail(recording_report.summary());
            }
            Outcome::Failed => {
                failed += 1;
                report.issue(recording_report.summary());
            }
        }
    }

    report.detail(format!(
        "imported={imported} skipped={skipped} failed={failed}"
    ));
    Ok(report)
}
