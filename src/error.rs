use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single recording. Every variant aborts only the recording it
/// occurred in; the run continues with the next one.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot derive a recording identifier from {path}: {reason}")]
    InvalidRecordingName { path: PathBuf, reason: String },
    #[error("chapter discovery failed for {path}: {source}")]
    ChapterDiscoveryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no capture timestamp could be resolved for {path}")]
    TimestampUnresolved { path: PathBuf },
    #[error("assembly copy failed for {path}: {source}")]
    CopyIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("transcode failed for recording {id}: {detail}")]
    TranscodeFailure { id: String, detail: String },
}

impl ImportError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRecordingName { .. } => "invalid-recording-name",
            Self::ChapterDiscoveryIo { .. } => "chapter-discovery-io",
            Self::TimestampUnresolved { .. } => "timestamp-unresolved",
            Self::CopyIo { .. } => "copy-io",
            Self::TranscodeFailure { .. } => "transcode-failure",
        }
    }
}
