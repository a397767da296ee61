use crate::tools::resolve_tool;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Tile the frames into a montage and pipe it through `convert` to add a
/// transparent border, writing PNG data to `outfile`.
pub fn montage_with_border(
    montage_bin: &Path,
    convert_bin: &Path,
    frames: &[PathBuf],
    geometry: &str,
    tile: &str,
    border: &str,
    outfile: &Path,
) -> Result<()> {
    let montage = resolve_tool(montage_bin, "montage")?;
    let convert = resolve_tool(convert_bin, "convert")?;

    let mut montage_child = Command::new(&montage)
        .args(frames)
        .arg("-geometry")
        .arg(geometry)
        .arg("-shadow")
        .arg("-tile")
        .arg(tile)
        .arg("-background")
        .arg("none")
        .arg("png:-")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to run `{}`", montage.display()))?;
    let montage_out = montage_child
        .stdout
        .take()
        .context("montage stdout unavailable")?;

    let convert_status = Command::new(&convert)
        .arg("-")
        .arg("-bordercolor")
        .arg("none")
        .arg("-border")
        .arg(border)
        .arg(format!("png:{}", outfile.display()))
        .stdin(Stdio::from(montage_out))
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("failed to run `{}`", convert.display()))?;

    let montage_status = montage_child
        .wait()
        .with_context(|| format!("failed to wait for `{}`", montage.display()))?;
    if !montage_status.success() {
        anyhow::bail!("montage exited with {montage_status}");
    }
    if !convert_status.success() {
        anyhow::bail!("convert exited with {convert_status}");
    }
    Ok(())
}
