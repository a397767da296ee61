use crate::tools::resolve_tool;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// One tag line from `exiftool -G -args`: `-Group:Tag=value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedTag {
    pub group: String,
    pub name: String,
    pub value: String,
}

pub fn parse_tag_line(line: &str) -> Option<ProbedTag> {
    let rest = line.trim().strip_prefix('-')?;
    let (name_part, value) = rest.split_once('=')?;
    let (group, name) = match name_part.split_once(':') {
        Some((group, name)) => (group.to_string(), name.to_string()),
        None => (String::new(), name_part.to_string()),
    };
    Some(ProbedTag {
        group,
        name,
        value: value.trim().to_string(),
    })
}

/// Query a single tag. Non-zero exit, empty output, and unparseable output
/// all come back as `Ok(None)`; tag absence is not an error.
pub fn read_tag(bin: &Path, tag: &str, path: &Path) -> Result<Option<ProbedTag>> {
    let bin = resolve_tool(bin, "exiftool")?;
    let out = Command::new(&bin)
        .arg("-G")
        .arg("-args")
        .arg(format!("-{tag}"))
        .arg(path)
        .output()
        .with_context(|| format!("failed to run `{}`", bin.display()))?;

    if !out.status.success() {
        return Ok(None);
    }

    let stdout = String::from_utf8_lossy(&out.stdout);
    Ok(stdout
        .lines()
        .find(|l| !l.trim().is_empty())
        .and_then(parse_tag_line))
}
