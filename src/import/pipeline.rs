use crate::error::ImportError;
use crate::import::chapters::Recording;
use crate::import::config::ImportConfig;
use crate::import::ledger::ImportLedger;
use crate::import::naming::OutputNamer;
use crate::import::paths::GpvPaths;
use crate::import::plan::{AssemblyMode, AssemblyPlan};
use crate::import::probe::{MetadataProbe, ProbeCatalogue};
use crate::import::timestamp::{self, CaptureInstant, TimestampSource};
use crate::thumbs::{self, ThumbOutcome};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Imported,
    SkippedDuplicate,
    Failed,
}

/// What happened to one recording. One of these is reported per candidate,
/// whatever the outcome.
#[derive(Debug, Clone, Serialize)]
pub struct RecordingReport {
    pub source: PathBuf,
    pub id: Option<String>,
    pub outcome: Outcome,
    pub chapters: usize,
    pub mode: Option<AssemblyMode>,
    pub output: Option<PathBuf>,
    pub timestamp: Option<&'static str>,
    pub reason: Option<String>,
}

impl RecordingReport {
    /// One text line for the run report.
    pub fn summary(&self) -> String {
        let source = self.source.display();
        match self.outcome {
            Outcome::Imported => format!(
                "imported {source} -> {} (chapters={} mode={} timestamp={})",
                self.output
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                self.chapters,
                self.mode.map(AssemblyMode::as_str).unwrap_or("?"),
                self.timestamp.unwrap_or("?"),
            ),
            Outcome::SkippedDuplicate => format!(
                "skipped-duplicate {source} (id={})",
                self.id.as_deref().unwrap_or("?")
            ),
            Outcome::Failed => format!(
                "failed {source}: {}",
                self.reason.as_deref().unwrap_or("unknown")
            ),
        }
    }
}

/// Sequential per-recording orchestration: group chapters, resolve the
/// capture time, name the output, dedup against the ledger, assemble, correct
/// timestamps, optionally thumbnail. Failures stay inside the recording they
/// happened in.
pub struct ImportPipeline<'a> {
    cfg: &'a ImportConfig,
    paths: &'a GpvPaths,
    probe: MetadataProbe,
    namer: OutputNamer,
    ledger: ImportLedger,
}

impl<'a> ImportPipeline<'a> {
    pub fn new(cfg: &'a ImportConfig, paths: &'a GpvPaths, output_dir: PathBuf) -> Self {
        let namer = OutputNamer::new(output_dir.clone());
        let ledger = ImportLedger::scan(&[output_dir], namer.scheme());
        let probe = MetadataProbe::new(ProbeCatalogue::default(), paths.exiftool_bin.clone());
        Self {
            cfg,
            paths,
            probe,
            namer,
            ledger,
        }
    }

    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }

    pub fn import(&mut self, primary: &Path) -> RecordingReport {
        match self.import_inner(primary) {
            Ok(report) => report,
            Err(err) => {
                warn!(source = %primary.display(), error = %format!("{err:#}"), "recording failed");
                RecordingReport {
                    source: primary.to_path_buf(),
                    id: None,
                    outcome: Outcome::Failed,
                    chapters: 0,
                    mode: None,
                    output: None,
                    timestamp: None,
                    reason: Some(format!("{}: {err:#}", err.kind())),
                }
            }
        }
    }

    fn import_inner(&mut self, primary: &Path) -> Result<RecordingReport, ImportError> {
        let mut recording = Recording::discover(primary)?;
        debug!(
            id = %recording.id,
            chapters = recording.chapters.len(),
            "recording discovered"
        );

        let capture = self.resolve_capture(&recording)?;
        recording.capture = Some(capture);

        let output = self.namer.name_for(&recording)?;
        recording.output = Some(output.clone());

        if self.ledger.is_imported(&recording.id) {
            info!(id = %recording.id, "already imported, skipping");
            return Ok(RecordingReport {
                source: primary.to_path_buf(),
                id: Some(recording.id.to_string()),
                outcome: Outcome::SkippedDuplicate,
                chapters: recording.chapters.len(),
                mode: None,
                output: None,
                timestamp: Some(capture.source.as_str()),
                reason: None,
            });
        }

        let plan = AssemblyPlan::build(
            &recording,
            &output,
            &self.cfg.assembly,
            &self.paths.scratch_dir,
        )?;
        info!(
            id = %recording.id,
            mode = %plan.mode,
            output = %output.display(),
            "assembling"
        );
        plan.execute(&self.paths.ffmpeg_bin, &recording, &output)?;

        if self.cfg.assembly.keep_timestamps
            && let Err(err) = timestamp::apply_mtime(&output, capture.at)
        {
            warn!(output = %output.display(), error = %format!("{err:#}"), "timestamp correction failed");
        }

        if self.cfg.thumbs.enabled {
            self.generate_thumbnail(&output, &capture);
        }

        self.ledger.record(recording.id.clone());
        Ok(RecordingReport {
            source: primary.to_path_buf(),
            id: Some(recording.id.to_string()),
            outcome: Outcome::Imported,
            chapters: recording.chapters.len(),
            mode: Some(plan.mode),
            output: Some(output),
            timestamp: Some(capture.source.as_str()),
            reason: None,
        })
    }

    /// Metadata first; when no tag yields a usable value, fall back to the
    /// primary's filesystem modification time. Only a failed fallback read
    /// fails the recording.
    fn resolve_capture(&self, recording: &Recording) -> Result<CaptureInstant, ImportError> {
        if let Some(at) = self.probe.resolve_capture_time(&recording.primary) {
            return Ok(CaptureInstant {
                at,
                source: TimestampSource::Metadata,
            });
        }
        match timestamp::from_file_mtime(&recording.primary) {
            Ok(at) => {
                info!(
                    source = %recording.primary.display(),
                    "no metadata capture time, using file mtime"
                );
                Ok(CaptureInstant {
                    at,
                    source: TimestampSource::FileMtime,
                })
            }
            Err(err) => {
                debug!(error = %format!("{err:#}"), "mtime fallback failed");
                Err(ImportError::TimestampUnresolved {
                    path: recording.primary.clone(),
                })
            }
        }
    }

    fn generate_thumbnail(&self, artifact: &Path, capture: &CaptureInstant) {
        match thumbs::montage_for(artifact, &self.cfg.thumbs, self.paths) {
            Ok(ThumbOutcome::Generated(thumb)) => {
                info!(thumb = %thumb.display(), "thumbnail generated");
                if self.cfg.assembly.keep_timestamps
                    && let Err(err) = timestamp::apply_mtime(&thumb, capture.at)
                {
                    warn!(thumb = %thumb.display(), error = %format!("{err:#}"), "thumbnail timestamp correction failed");
                }
            }
            Ok(ThumbOutcome::SkippedExisting) => {
                debug!(artifact = %artifact.display(), "thumbnail exists, skipping");
            }
            Err(err) => {
                warn!(
                    artifact = %artifact.display(),
                    error = %format!("{err:#}"),
                    "thumbnail generation failed, continuing"
                );
            }
        }
    }
}
