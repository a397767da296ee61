use crate::error::ImportError;
use crate::import::chapters::Recording;
use crate::import::config::AssemblyConfig;
use crate::import::manifest::ChapterManifest;
use crate::tools;
use std::fmt;
use std::fs;
use std::path::Path;

/// Encoder used for re-encode assemblies.
pub const VIDEO_CODEC: &str = "libx264";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssemblyMode {
    Copy,
    ConcatCopy,
    ConcatEncode,
}

impl AssemblyMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::ConcatCopy => "concat-copy",
            Self::ConcatEncode => "concat-encode",
        }
    }
}

impl fmt::Display for AssemblyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A re-encode request wins over chapter count; chapter count only decides
/// the input form (manifest concat vs direct file).
pub fn select_mode(chaptered: bool, encode: bool) -> AssemblyMode {
    match (chaptered, encode) {
        (_, true) => AssemblyMode::ConcatEncode,
        (true, false) => AssemblyMode::ConcatCopy,
        (false, false) => AssemblyMode::Copy,
    }
}

/// The chosen assembly operation for one recording: mode, the transcoder
/// argument list (empty for plain copies), and the scratch manifest kept
/// alive until the plan is dropped.
#[derive(Debug)]
pub struct AssemblyPlan {
    pub mode: AssemblyMode,
    pub args: Vec<String>,
    manifest: Option<ChapterManifest>,
}

impl AssemblyPlan {
    pub fn build(
        recording: &Recording,
        output: &Path,
        cfg: &AssemblyConfig,
        scratch_dir: &Path,
    ) -> Result<Self, ImportError> {
        let mode = select_mode(recording.is_chaptered(), cfg.encode);
        if mode == AssemblyMode::Copy {
            return Ok(Self {
                mode,
                args: Vec::new(),
                manifest: None,
            });
        }

        // colliding output names overwrite silently, so the transcoder must
        // never block on an overwrite prompt
        let mut args = vec!["-y".to_string()];

        let manifest = if recording.is_chaptered() {
            let manifest = ChapterManifest::write(scratch_dir, recording).map_err(|err| {
                ImportError::TranscodeFailure {
                    id: recording.id.to_string(),
                    detail: format!("chapter manifest: {err:#}"),
                }
            })?;
            args.extend([
                "-f".to_string(),
                "concat".to_string(),
                "-safe".to_string(),
                "0".to_string(),
                "-i".to_string(),
                manifest.path().display().to_string(),
            ]);
            Some(manifest)
        } else {
            args.extend([
                "-i".to_string(),
                recording.primary.display().to_string(),
            ]);
            None
        };

        match mode {
            AssemblyMode::ConcatCopy => {
                args.extend(["-c".to_string(), "copy".to_string()]);
            }
            AssemblyMode::ConcatEncode => {
                args.extend([
                    "-c:v".to_string(),
                    VIDEO_CODEC.to_string(),
                    "-crf".to_string(),
                    cfg.crf.to_string(),
                ]);
                if let Some(scale) = &cfg.scale {
                    args.extend(["-vf".to_string(), format!("scale={scale}")]);
                }
                args.extend([
                    "-c:a".to_string(),
                    "copy".to_string(),
                    "-movflags".to_string(),
                    "+faststart".to_string(),
                ]);
                if manifest.is_none() {
                    // direct input: carry the source metadata through
                    args.extend(["-map_metadata".to_string(), "0".to_string()]);
                }
            }
            AssemblyMode::Copy => unreachable!("copy plans return early"),
        }

        // the concat manifest drops embedded metadata, so the capture time is
        // tagged onto the output explicitly
        if manifest.is_some()
            && let Some(capture) = &recording.capture
        {
            args.extend([
                "-metadata".to_string(),
                format!("creation_time={}", capture.at.format("%Y-%m-%dT%H:%M:%S")),
            ]);
        }

        args.push(output.display().to_string());
        Ok(Self {
            mode,
            args,
            manifest,
        })
    }

    /// Run the plan and require a readable artifact at `output` afterwards.
    pub fn execute(
        &self,
        ffmpeg_bin: &Path,
        recording: &Recording,
        output: &Path,
    ) -> Result<(), ImportError> {
        match self.mode {
            AssemblyMode::Copy => {
                copy_preserving(&recording.primary, output).map_err(|source| {
                    ImportError::CopyIo {
                        path: output.to_path_buf(),
                        source,
                    }
                })?;
            }
            AssemblyMode::ConcatCopy | AssemblyMode::ConcatEncode => {
                tools::ffmpeg::run(ffmpeg_bin, &self.args).map_err(|err| {
                    ImportError::TranscodeFailure {
                        id: recording.id.to_string(),
                        detail: format!("{err:#}"),
                    }
                })?;
            }
        }

        fs::metadata(output).map_err(|_| ImportError::TranscodeFailure {
            id: recording.id.to_string(),
            detail: format!("no readable output at {}", output.display()),
        })?;
        Ok(())
    }
}

/// Byte copy that keeps the source modification time on the destination, the
/// closest filesystem equivalent of copying with metadata.
fn copy_preserving(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::copy(src, dst)?;
    let modified = fs::metadata(src)?.modified()?;
    let file = fs::File::options().write(true).open(dst)?;
    file.set_modified(modified)?;
    Ok(())
}
