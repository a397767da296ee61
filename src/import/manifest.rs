use crate::import::chapters::Recording;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordered chapter list in ffmpeg concat format, written to the scratch
/// directory. The name is deterministic per recording identifier and source
/// directory (`gpv.{id}.{hash8}.chaps`), so repeated runs reuse one path and
/// runs against different source trees cannot collide. Removed on drop.
#[derive(Debug)]
pub struct ChapterManifest {
    path: PathBuf,
}

impl ChapterManifest {
    pub fn write(scratch_dir: &Path, recording: &Recording) -> Result<Self> {
        let digest = Sha256::digest(recording.dir.to_string_lossy().as_bytes());
        let hex = format!("{digest:x}");
        let path = scratch_dir.join(format!(
            "gpv.{}.{}.chaps",
            recording.id,
            &hex[..8]
        ));

        let mut body = String::new();
        for chapter in &recording.chapters {
            let quoted = chapter.display().to_string().replace('\'', r"'\''");
            body.push_str(&format!("file '{quoted}'\n"));
        }
        fs::write(&path, body)
            .with_context(|| format!("failed to write chapter manifest {}", path.display()))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ChapterManifest {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %err, "manifest cleanup failed");
        }
    }
}
