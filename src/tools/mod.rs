pub mod exiftool;
pub mod ffmpeg;
pub mod ffprobe;
pub mod magick;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// The configured binary if it exists on disk, else a PATH lookup on the
/// configured name, else a PATH lookup on the conventional name.
pub fn resolve_tool(configured: &Path, name: &str) -> Result<PathBuf> {
    if configured.is_file() {
        return Ok(configured.to_path_buf());
    }
    which::which(configured)
        .or_else(|_| which::which(name))
        .with_context(|| {
            format!(
                "{name} binary not found at {} or on PATH",
                configured.display()
            )
        })
}

pub fn tool_available(configured: &Path, name: &str) -> bool {
    resolve_tool(configured, name).is_ok()
}
