use crate::tools::resolve_tool;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Run ffmpeg with the given argument list. Success is a zero exit; anything
/// else surfaces stdout and stderr in the error.
pub fn run(bin: &Path, args: &[String]) -> Result<()> {
    let bin = resolve_tool(bin, "ffmpeg")?;
    debug!(bin = %bin.display(), args = %args.join(" "), "running ffmpeg");
    let out = Command::new(&bin)
        .args(args)
        .output()
        .with_context(|| format!("failed to run `{}`", bin.display()))?;

    if out.status.success() {
        return Ok(());
    }

    anyhow::bail!(
        "ffmpeg exited with {}\nstdout: {}\nstderr: {}",
        out.status,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    )
}
