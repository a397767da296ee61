pub mod import;
pub mod status;
pub mod thumbs;

use serde::Serialize;
use std::path::Path;

/// Outcome of one subcommand run: free-form detail lines plus the issues that
/// flipped it to not-ok. Printed as text or JSON by the CLI layer.
#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

/// Pre-flight check for a collaborator binary; records an issue when it
/// cannot be resolved.
pub fn ensure_tool(report: &mut CommandReport, configured: &Path, name: &str) -> bool {
    if crate::tools::tool_available(configured, name) {
        return true;
    }
    report.issue(format!(
        "{name} binary unavailable; set GPV_{}_BIN or ensure {name} is on PATH",
        name.to_uppercase()
    ));
    false
}
