use anyhow::Result;
use std::path::PathBuf;

use crate::commands::{CommandReport, ensure_tool};
use crate::import::config;
use crate::import::paths::resolve_paths;
use crate::thumbs::{self, ThumbOutcome};

#[derive(Debug, Clone)]
pub struct ThumbsOptions {
    pub inputs: Vec<PathBuf>,
}

pub fn run(opts: &ThumbsOptions) -> Result<CommandReport> {
    let cfg = config::load_config()?;
    let paths = resolve_paths();
    let mut report = CommandReport::new("thumbs");

    let tools_ok = ensure_tool(&mut report, &paths.ffprobe_bin, "ffprobe")
        && ensure_tool(&mut report, &paths.ffmpeg_bin, "ffmpeg")
        && ensure_tool(&mut report, &paths.montage_bin, "montage")
        && ensure_tool(&mut report, &paths.convert_bin, "convert");
    if !tools_ok {
        return Ok(report);
    }

    for input in &opts.inputs {
        match thumbs::montage_for(input, &cfg.thumbs, &paths) {
            Ok(ThumbOutcome::Generated(thumb)) => {
                report.detail(format!("generated {}", thumb.display()));
            }
            Ok(ThumbOutcome::SkippedExisting) => {
                report.detail(format!("skipped {} (thumbnail exists)", input.display()));
            }
            Err(err) => {
                report.issue(format!("failed {}: {err:#}", input.display()));
            }
        }
    }

    Ok(report)
}
