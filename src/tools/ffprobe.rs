use crate::tools::resolve_tool;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Container duration of `media` in seconds.
pub fn duration_secs(bin: &Path, media: &Path) -> Result<f64> {
    let bin = resolve_tool(bin, "ffprobe")?;
    let out = Command::new(&bin)
        .arg("-print_format")
        .arg("default=nk=1:nw=1")
        .arg("-show_entries")
        .arg("format=duration")
        .arg(media)
        .output()
        .with_context(|| format!("failed to run `{}`", bin.display()))?;

    if !out.status.success() {
        anyhow::bail!(
            "ffprobe exited with {}\nstderr: {}",
            out.status,
            String::from_utf8_lossy(&out.stderr)
        );
    }

    let stdout = String::from_utf8_lossy(&out.stdout);
    let first = stdout.lines().next().unwrap_or("").trim();
    first
        .parse::<f64>()
        .with_context(|| format!("unexpected ffprobe duration output: {first:?}"))
}
