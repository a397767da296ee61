use crate::import::chapters::RecordingId;
use crate::import::naming::OutputNameScheme;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Identifiers already present in one or more destination directories,
/// derived from a filename scan. A pure membership set: a textual heuristic,
/// not a content hash, so renamed or re-encoded artifacts do not count.
#[derive(Debug, Default)]
pub struct ImportLedger {
    ids: BTreeSet<RecordingId>,
}

impl ImportLedger {
    /// Scan every destination directory for filenames carrying the output
    /// marker and collect their identifiers. Unreadable directories
    /// contribute nothing; unrelated filenames are ignored.
    pub fn scan(dirs: &[PathBuf], scheme: &OutputNameScheme) -> Self {
        let mut ids = BTreeSet::new();
        for dir in dirs {
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(err) => {
                    debug!(dir = %dir.display(), error = %err, "ledger scan skipped directory");
                    continue;
                }
            };
            for entry in entries.flatten() {
                let name = entry.file_name();
                let Some(name) = name.to_str() else { continue };
                if let Some(id) = scheme.identifier_of(name) {
                    ids.insert(id);
                }
            }
        }
        Self { ids }
    }

    pub fn is_imported(&self, id: &RecordingId) -> bool {
        self.ids.contains(id)
    }

    /// Remember an identifier imported during this run, so a second
    /// occurrence of the same recording is skipped like a prior import.
    pub fn record(&mut self, id: RecordingId) {
        self.ids.insert(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
