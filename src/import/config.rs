use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    pub encode: bool,
    pub crf: u32,
    pub scale: Option<String>,
    pub keep_timestamps: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            encode: false,
            crf: 23,
            scale: None,
            keep_timestamps: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extension tokens a directory scan accepts, compared exactly.
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["MP4".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbsConfig {
    pub enabled: bool,
    pub frames: u32,
    pub start_offset_secs: f64,
    pub tile: String,
    pub geometry: String,
    pub border: String,
    pub extension: String,
    pub skip_existing: bool,
}

impl Default for ThumbsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            frames: 4,
            start_offset_secs: 5.0,
            tile: "2x2".to_string(),
            geometry: "240x135+4+3>".to_string(),
            border: "22x8".to_string(),
            extension: "tbn".to_string(),
            skip_existing: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ImportConfig {
    pub assembly: AssemblyConfig,
    pub scan: ScanConfig,
    pub thumbs: ThumbsConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialImportConfig {
    assembly: Option<AssemblyConfig>,
    scan: Option<ScanConfig>,
    thumbs: Option<ThumbsConfig>,
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "on" => true,
            "0" | "false" | "FALSE" | "no" | "off" => false,
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

fn env_or_u32(var: &str, fallback: u32) -> u32 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u32>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_f64(var: &str, fallback: f64) -> f64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<f64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

/// Set-and-empty clears the value; set-and-non-empty replaces it.
fn env_or_opt_string(var: &str, fallback: &Option<String>) -> Option<String> {
    match env::var(var) {
        Ok(v) => {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => fallback.clone(),
    }
}

fn env_or_csv(var: &str, fallback: &[String]) -> Vec<String> {
    match env::var(var) {
        Ok(v) => {
            let out = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>();
            if out.is_empty() { fallback.to_vec() } else { out }
        }
        Err(_) => fallback.to_vec(),
    }
}

pub fn validate(cfg: &ImportConfig) -> Result<()> {
    if cfg.assembly.crf > 51 {
        return Err(anyhow!("invalid crf: x264 accepts 0..=51"));
    }
    if let Some(scale) = &cfg.assembly.scale
        && scale.trim().is_empty()
    {
        return Err(anyhow!("invalid scale filter: cannot be empty"));
    }
    if cfg.scan.extensions.is_empty() {
        return Err(anyhow!("invalid extensions: need at least one"));
    }
    if cfg.scan.extensions.iter().any(|e| e.trim().is_empty()) {
        return Err(anyhow!("invalid extensions: empty entry"));
    }
    if cfg.thumbs.frames == 0 {
        return Err(anyhow!("invalid thumbnail frames: must be >= 1"));
    }
    if cfg.thumbs.start_offset_secs < 0.0 {
        return Err(anyhow!("invalid thumbnail start offset: must be >= 0"));
    }
    if cfg.thumbs.tile.trim().is_empty() {
        return Err(anyhow!("invalid thumbnail tile: cannot be empty"));
    }
    if cfg.thumbs.extension.trim().is_empty() {
        return Err(anyhow!("invalid thumbnail extension: cannot be empty"));
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("GPV_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let home = dirs::home_dir()?;
    Some(home.join(".gpv").join("config.toml"))
}

fn merge_file_config(base: &mut ImportConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    let parsed: PartialImportConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse config {}: {err}", path.display()))?;
    if let Some(assembly) = parsed.assembly {
        base.assembly = assembly;
    }
    if let Some(scan) = parsed.scan {
        base.scan = scan;
    }
    if let Some(thumbs) = parsed.thumbs {
        base.thumbs = thumbs;
    }
    Ok(())
}

/// Defaults, overlaid by the optional TOML file, overlaid by `GPV_*` env
/// variables, then validated. CLI flags are applied on top by the caller.
pub fn load_config() -> Result<ImportConfig> {
    let mut cfg = ImportConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.assembly.encode = env_or_bool("GPV_ENCODE", cfg.assembly.encode);
    cfg.assembly.crf = env_or_u32("GPV_CRF", cfg.assembly.crf);
    cfg.assembly.scale = env_or_opt_string("GPV_SCALE", &cfg.assembly.scale);
    cfg.assembly.keep_timestamps = env_or_bool("GPV_KEEP_TIMESTAMPS", cfg.assembly.keep_timestamps);
    cfg.scan.extensions = env_or_csv("GPV_EXTENSIONS", &cfg.scan.extensions);
    cfg.thumbs.enabled = env_or_bool("GPV_THUMBS", cfg.thumbs.enabled);
    cfg.thumbs.frames = env_or_u32("GPV_THUMB_FRAMES", cfg.thumbs.frames);
    cfg.thumbs.start_offset_secs =
        env_or_f64("GPV_THUMB_START_OFFSET_SECS", cfg.thumbs.start_offset_secs);
    cfg.thumbs.skip_existing = env_or_bool("GPV_THUMB_SKIP_EXISTING", cfg.thumbs.skip_existing);

    validate(&cfg)?;
    Ok(cfg)
}
