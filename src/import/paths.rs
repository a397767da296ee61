use std::env;
use std::path::PathBuf;

/// Directories and external binaries the run works with. Every entry can be
/// overridden through the environment, which is also how the integration
/// tests substitute fake tools.
#[derive(Debug, Clone)]
pub struct GpvPaths {
    pub output_dir: Option<PathBuf>,
    pub scratch_dir: PathBuf,
    pub exiftool_bin: PathBuf,
    pub ffmpeg_bin: PathBuf,
    pub ffprobe_bin: PathBuf,
    pub montage_bin: PathBuf,
    pub convert_bin: PathBuf,
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
        _ => None,
    }
}

pub fn resolve_paths() -> GpvPaths {
    GpvPaths {
        output_dir: env_path("GPV_OUTPUT_DIR"),
        scratch_dir: env_or_default_path("GPV_SCRATCH_DIR", env::temp_dir()),
        exiftool_bin: env_or_default_path("GPV_EXIFTOOL_BIN", PathBuf::from("exiftool")),
        ffmpeg_bin: env_or_default_path("GPV_FFMPEG_BIN", PathBuf::from("ffmpeg")),
        ffprobe_bin: env_or_default_path("GPV_FFPROBE_BIN", PathBuf::from("ffprobe")),
        montage_bin: env_or_default_path("GPV_MONTAGE_BIN", PathBuf::from("montage")),
        convert_bin: env_or_default_path("GPV_CONVERT_BIN", PathBuf::from("convert")),
    }
}
