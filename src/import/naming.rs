use crate::error::ImportError;
use crate::import::chapters::{Recording, RecordingId};
use chrono::NaiveDateTime;
use regex::Regex;
use std::path::PathBuf;

/// Prefix every produced artifact carries; also the marker the ledger scans
/// destination directories for.
pub const OUTPUT_MARKER: &str = "gpv.";

/// Shape of produced filenames:
/// `gpv.{YYYY.MM.DD_HH.MM.SS}.{stem}[.ch{first:02}-{last:02}].{ext}` with the
/// extension lower-cased and the chapter span present only when chaptered.
#[derive(Debug, Clone)]
pub struct OutputNameScheme {
    marker: &'static str,
    span_suffix: Regex,
}

impl Default for OutputNameScheme {
    fn default() -> Self {
        Self {
            marker: OUTPUT_MARKER,
            span_suffix: Regex::new(r"\.ch\d{2}-\d{2}$").expect("span-suffix pattern is valid"),
        }
    }
}

impl OutputNameScheme {
    pub fn file_name(&self, recording: &Recording, at: &NaiveDateTime) -> String {
        let stamp = at.format("%Y.%m.%d_%H.%M.%S");
        let ext = recording.ext.to_lowercase();
        if recording.is_chaptered() {
            let (first, last) = recording.chapter_span();
            format!(
                "{}{stamp}.{}.ch{first:02}-{last:02}.{ext}",
                self.marker, recording.stem
            )
        } else {
            format!("{}{stamp}.{}.{ext}", self.marker, recording.stem)
        }
    }

    /// Recover the recording identifier from an existing output filename, or
    /// `None` when the name was not produced by this scheme. Matches any
    /// extension casing so artifacts imported by older versions still count.
    pub fn identifier_of(&self, file_name: &str) -> Option<RecordingId> {
        let rest = file_name.strip_prefix(self.marker)?;
        let (stem, _ext) = rest.rsplit_once('.')?;
        let stem = self.span_suffix.replace(stem, "");
        RecordingId::from_stem(&stem)
    }
}

/// Computes destination paths. The directory is fixed at construction:
/// caller-supplied destination, else the current working directory.
#[derive(Debug, Clone)]
pub struct OutputNamer {
    scheme: OutputNameScheme,
    dir: PathBuf,
}

impl OutputNamer {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            scheme: OutputNameScheme::default(),
            dir,
        }
    }

    pub fn scheme(&self) -> &OutputNameScheme {
        &self.scheme
    }

    /// Destination path for `recording`. The capture timestamp must already
    /// be resolved; naming an unresolved recording is an error, never a
    /// half-formed filename.
    pub fn name_for(&self, recording: &Recording) -> Result<PathBuf, ImportError> {
        let capture = recording
            .capture
            .as_ref()
            .ok_or_else(|| ImportError::TimestampUnresolved {
                path: recording.primary.clone(),
            })?;
        Ok(self
            .dir
            .join(self.scheme.file_name(recording, &capture.at)))
    }
}
