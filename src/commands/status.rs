use anyhow::Result;
use std::env;

use crate::commands::CommandReport;
use crate::import::config;
use crate::import::paths::resolve_paths;
use crate::tools;

include!(concat!(env!("OUT_DIR"), "/gpv_env_allowlist.rs"));

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths();
    let mut report = CommandReport::new("status");

    report.detail(format!("scratch_dir={}", paths.scratch_dir.display()));
    match &paths.output_dir {
        Some(dir) => report.detail(format!("output_dir={}", dir.display())),
        None => report.detail("output_dir=<current directory>".to_string()),
    }

    let bins = [
        (&paths.exiftool_bin, "exiftool"),
        (&paths.ffmpeg_bin, "ffmpeg"),
        (&paths.ffprobe_bin, "ffprobe"),
        (&paths.montage_bin, "montage"),
        (&paths.convert_bin, "convert"),
    ];
    for (configured, name) in bins {
        match tools::resolve_tool(configured, name) {
            Ok(resolved) => report.detail(format!("{name}={}", resolved.display())),
            Err(_) => report.issue(format!(
                "missing {name} (set GPV_{}_BIN or install it)",
                name.to_uppercase()
            )),
        }
    }

    for key in GENERATED_GPV_ENV_ALLOWLIST {
        if let Ok(value) = env::var(key) {
            report.detail(format!("env {key}={value}"));
        }
    }

    match config::load_config() {
        Ok(cfg) => {
            report.detail(format!(
                "config encode={} crf={} scale={} keep_timestamps={} thumbs={} extensions={}",
                cfg.assembly.encode,
                cfg.assembly.crf,
                cfg.assembly.scale.as_deref().unwrap_or("-"),
                cfg.assembly.keep_timestamps,
                cfg.thumbs.enabled,
                cfg.scan.extensions.join(",")
            ));
        }
        Err(err) => {
            report.issue(format!("config invalid: {err:#}"));
        }
    }

    Ok(report)
}
