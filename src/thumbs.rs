use crate::import::config::ThumbsConfig;
use crate::import::paths::GpvPaths;
use crate::tools;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbOutcome {
    Generated(PathBuf),
    SkippedExisting,
}

/// Build a tiled thumbnail montage next to `video` (`<stem>.tbn` by
/// default): probe the duration, grab evenly spaced frames, tile them, add a
/// border. Frames live in a scoped temp directory that vanishes afterwards.
pub fn montage_for(video: &Path, cfg: &ThumbsConfig, paths: &GpvPaths) -> Result<ThumbOutcome> {
    let Some(outfile) = target_path(video, cfg)? else {
        return Ok(ThumbOutcome::SkippedExisting);
    };

    let duration = tools::ffprobe::duration_secs(&paths.ffprobe_bin, video)?;
    let (_frames_dir, frames) = extract_frames(video, duration, cfg, paths)?;
    tools::magick::montage_with_border(
        &paths.montage_bin,
        &paths.convert_bin,
        &frames,
        &cfg.geometry,
        &cfg.tile,
        &cfg.border,
        &outfile,
    )?;

    if !outfile.is_file() {
        anyhow::bail!("montage produced no file at {}", outfile.display());
    }
    Ok(ThumbOutcome::Generated(outfile))
}

/// Where the montage goes. `None` means the target exists and is kept; with
/// `skip_existing` off, a free `_1`..`_99` variant is picked instead.
fn target_path(video: &Path, cfg: &ThumbsConfig) -> Result<Option<PathBuf>> {
    let base = video.with_extension(&cfg.extension);
    if !base.exists() {
        return Ok(Some(base));
    }
    if cfg.skip_existing {
        return Ok(None);
    }

    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .context("thumbnail target has no stem")?
        .to_string();
    for i in 1..100 {
        let variant = base.with_file_name(format!("{stem}_{i}.{}", cfg.extension));
        if !variant.exists() {
            return Ok(Some(variant));
        }
    }
    anyhow::bail!("no free thumbnail name next to {}", video.display())
}

fn extract_frames(
    video: &Path,
    duration: f64,
    cfg: &ThumbsConfig,
    paths: &GpvPaths,
) -> Result<(TempDir, Vec<PathBuf>)> {
    let start = if duration > cfg.start_offset_secs {
        cfg.start_offset_secs
    } else {
        0.0
    };
    let span = duration - start;
    if span <= 0.0 {
        anyhow::bail!(
            "media too short for thumbnails ({duration:.2}s): {}",
            video.display()
        );
    }
    let step = span / f64::from(cfg.frames + 1);

    let dir = tempfile::tempdir().context("failed to create thumbnail scratch dir")?;
    let mut frames = Vec::new();
    let mut pos = start;
    for i in 0..cfg.frames {
        let frame = dir.path().join(format!("frame_{i}.jpg"));
        let args = vec![
            "-n".to_string(),
            "-ss".to_string(),
            format!("{pos:.3}"),
            "-i".to_string(),
            video.display().to_string(),
            "-frames:v".to_string(),
            "1".to_string(),
            frame.display().to_string(),
        ];
        tools::ffmpeg::run(&paths.ffmpeg_bin, &args)
            .with_context(|| format!("frame grab {i} at {pos:.3}s failed"))?;
        debug!(frame = %frame.display(), "frame extracted");
        frames.push(frame);
        pos += step;
    }
    Ok((dir, frames))
}
