use crate::error::ImportError;
use crate::import::timestamp::CaptureInstant;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Width of the numeric identifier tail in a recording filename stem.
pub const ID_WIDTH: usize = 4;

/// Fixed-width numeric tail of a recording filename stem: `GOPR1234` and its
/// chapter siblings `GP011234`, `GP021234` all carry the identifier `1234`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub struct RecordingId(String);

impl RecordingId {
    pub fn from_stem(stem: &str) -> Option<Self> {
        let start = stem.len().checked_sub(ID_WIDTH)?;
        let tail = stem.get(start..)?;
        if tail.chars().all(|c| c.is_ascii_digit()) {
            Some(Self(tail.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn numeric(&self) -> u32 {
        // four ASCII digits by construction
        self.0.parse().unwrap_or(0)
    }
}

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One logical recording: the primary file it was discovered from plus every
/// sibling chapter sharing its identifier and extension. Capture timestamp
/// and output path are filled in as the pipeline resolves them.
#[derive(Debug, Clone)]
pub struct Recording {
    pub id: RecordingId,
    pub primary: PathBuf,
    pub dir: PathBuf,
    pub stem: String,
    pub ext: String,
    pub chapters: Vec<PathBuf>,
    pub capture: Option<CaptureInstant>,
    pub output: Option<PathBuf>,
}

impl Recording {
    /// Group the chapters of the recording `primary` belongs to: every file in
    /// the same directory whose name ends with `{identifier}.{extension}`,
    /// sorted ascending by filename. Extension comparison is case-sensitive.
    pub fn discover(primary: &Path) -> Result<Self, ImportError> {
        let invalid = |reason: &str| ImportError::InvalidRecordingName {
            path: primary.to_path_buf(),
            reason: reason.to_string(),
        };

        let stem = primary
            .file_stem()
            .and_then(OsStr::to_str)
            .ok_or_else(|| invalid("filename is not valid UTF-8"))?
            .to_string();
        let ext = primary
            .extension()
            .and_then(OsStr::to_str)
            .ok_or_else(|| invalid("filename has no extension"))?
            .to_string();
        let id = RecordingId::from_stem(&stem)
            .ok_or_else(|| invalid("stem does not end in a 4-digit identifier"))?;

        let dir = match primary.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let discovery_err = |source: std::io::Error| ImportError::ChapterDiscoveryIo {
            path: dir.clone(),
            source,
        };

        let suffix = format!("{id}.{ext}");
        let mut chapters = Vec::new();
        for entry in fs::read_dir(&dir).map_err(discovery_err)? {
            let entry = entry.map_err(discovery_err)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(OsStr::to_str) else {
                continue;
            };
            if name.ends_with(&suffix) {
                chapters.push(path);
            }
        }
        chapters.sort();

        if chapters.is_empty() {
            return Err(discovery_err(std::io::Error::new(
                ErrorKind::NotFound,
                format!("no files matching *{suffix}"),
            )));
        }

        Ok(Self {
            id,
            primary: primary.to_path_buf(),
            dir,
            stem,
            ext,
            chapters,
            capture: None,
            output: None,
        })
    }

    pub fn is_chaptered(&self) -> bool {
        self.chapters.len() > 1
    }

    /// Smallest and largest chapter sequence index in the set. Indices come
    /// from the digits preceding the identifier in each chapter stem
    /// (`GP02xxxx` is chapter 2, the digitless `GOPRxxxx` primary is chapter
    /// 0); a stem that yields no index falls back to its sorted position.
    pub fn chapter_span(&self) -> (u32, u32) {
        let mut lo = u32::MAX;
        let mut hi = 0u32;
        for (pos, path) in self.chapters.iter().enumerate() {
            let idx = path
                .file_stem()
                .and_then(OsStr::to_str)
                .and_then(|stem| chapter_index(stem, &self.id))
                .unwrap_or(pos as u32);
            lo = lo.min(idx);
            hi = hi.max(idx);
        }
        (lo, hi)
    }
}

/// Sequence index encoded in a chapter stem, i.e. the run of digits directly
/// before the identifier. An empty run means the chapter-0 primary.
pub fn chapter_index(stem: &str, id: &RecordingId) -> Option<u32> {
    let head = stem.strip_suffix(id.as_str())?;
    let run_start = head
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);
    match run_start {
        None => Some(0),
        Some(i) => head[i..].parse().ok(),
    }
}
