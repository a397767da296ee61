use crate::import::chapters::RecordingId;
use anyhow::{Context, Result, anyhow};
use regex::Regex;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;

/// Inclusive identifier range, e.g. `0001-0012`.
#[derive(Debug, Clone, Copy)]
pub struct IdRange {
    lo: u32,
    hi: u32,
}

impl IdRange {
    pub fn parse(text: &str) -> Result<Self> {
        let (lo, hi) = text
            .split_once('-')
            .ok_or_else(|| anyhow!("range must look like 0001-0012, got {text:?}"))?;
        let lo: u32 = lo.trim().parse().context("range start is not a number")?;
        let hi: u32 = hi.trim().parse().context("range end is not a number")?;
        if lo > hi {
            return Err(anyhow!("range start {lo} is past range end {hi}"));
        }
        Ok(Self { lo, hi })
    }

    pub fn contains(&self, n: u32) -> bool {
        (self.lo..=self.hi).contains(&n)
    }
}

#[derive(Debug, Default)]
pub struct ScanOptions {
    pub mask: Option<Regex>,
    pub range: Option<IdRange>,
    pub extensions: Vec<String>,
}

/// Chapter continuations (`GP` + two digits) never seed a recording of their
/// own when a directory is scanned; grouping reaches them from the primary.
fn is_chapter_continuation(stem: &str) -> bool {
    let b = stem.as_bytes();
    b.len() >= 4 && b[0] == b'G' && b[1] == b'P' && b[2].is_ascii_digit() && b[3].is_ascii_digit()
}

/// Expand the positional inputs into a sorted candidate list: files are taken
/// as given, directories contribute entries matching the extension list, and
/// the optional mask/range filters are applied to everything.
pub fn collect_candidates(inputs: &[PathBuf], opts: &ScanOptions) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }
        let entries = fs::read_dir(input)
            .with_context(|| format!("failed to list input directory {}", input.display()))?;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("failed to list input directory {}", input.display()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(OsStr::to_str) else {
                continue;
            };
            if !opts.extensions.iter().any(|e| e == ext) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(OsStr::to_str) else {
                continue;
            };
            if is_chapter_continuation(stem) {
                continue;
            }
            files.push(path);
        }
    }

    if let Some(mask) = &opts.mask {
        files.retain(|p| mask.is_match(&p.to_string_lossy()));
    }
    if let Some(range) = &opts.range {
        files.retain(|p| {
            p.file_stem()
                .and_then(OsStr::to_str)
                .and_then(RecordingId::from_stem)
                .is_some_and(|id| range.contains(id.numeric()))
        });
    }

    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::{IdRange, ScanOptions, collect_candidates, is_chapter_continuation};
    use std::fs;

    fn opts() -> ScanOptions {
        ScanOptions {
            extensions: vec!["MP4".to_string()],
            ..ScanOptions::default()
        }
    }

    fn names(paths: &[std::path::PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn continuation_stems_are_detected() {
        assert!(is_chapter_continuation("GP011234"));
        assert!(is_chapter_continuation("GP991234"));
        assert!(!is_chapter_continuation("GOPR1234"));
        assert!(!is_chapter_continuation("GP"));
    }

    #[test]
    fn directory_scan_keeps_primaries_only() {
        let tmp = tempfile::tempdir().expect("tempdir");
        for name in ["GOPR1234.MP4", "GP011234.MP4", "GOPR5678.MP4", "pic.JPG"] {
            fs::write(tmp.path().join(name), b"x").expect("write");
        }

        let got = collect_candidates(&[tmp.path().to_path_buf()], &opts()).expect("scan");
        assert_eq!(names(&got), vec!["GOPR1234.MP4", "GOPR5678.MP4"]);
    }

    #[test]
    fn explicit_files_bypass_the_extension_filter() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let file = tmp.path().join("clip.mov");
        fs::write(&file, b"x").expect("write");

        let got = collect_candidates(&[file.clone()], &opts()).expect("scan");
        assert_eq!(got, vec![file]);
    }

    #[test]
    fn mask_filters_by_path_text() {
        let tmp = tempfile::tempdir().expect("tempdir");
        for name in ["GOPR1234.MP4", "GOPR5678.MP4"] {
            fs::write(tmp.path().join(name), b"x").expect("write");
        }
        let mut o = opts();
        o.mask = Some(regex::Regex::new("1234").unwrap());

        let got = collect_candidates(&[tmp.path().to_path_buf()], &o).expect("scan");
        assert_eq!(names(&got), vec!["GOPR1234.MP4"]);
    }

    #[test]
    fn range_filters_by_identifier() {
        let tmp = tempfile::tempdir().expect("tempdir");
        for name in ["GOPR0001.MP4", "GOPR0002.MP4", "GOPR0010.MP4"] {
            fs::write(tmp.path().join(name), b"x").expect("write");
        }
        let mut o = opts();
        o.range = Some(IdRange::parse("0001-0002").expect("range"));

        let got = collect_candidates(&[tmp.path().to_path_buf()], &o).expect("scan");
        assert_eq!(names(&got), vec!["GOPR0001.MP4", "GOPR0002.MP4"]);
    }

    #[test]
    fn bad_ranges_are_rejected() {
        assert!(IdRange::parse("0001").is_err());
        assert!(IdRange::parse("b-c").is_err());
        assert!(IdRange::parse("0005-0001").is_err());
    }

    #[test]
    fn duplicate_mentions_collapse() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let file = tmp.path().join("GOPR1234.MP4");
        fs::write(&file, b"x").expect("write");

        let got = collect_candidates(&[file.clone(), tmp.path().to_path_buf()], &opts())
            .expect("scan");
        assert_eq!(got.len(), 1);
    }
}
