use anyhow::{Context, Result};
use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Date-time layout embedded in metadata tag text: fixed component order
/// year(4) month(2) day(2) hour(2) minute(2) second(2), with an optional
/// single non-alphanumeric separator between any two components.
const DATE_TIME_PATTERN: &str = r"(\d{4})[^a-zA-Z0-9]?(\d{2})[^a-zA-Z0-9]?(\d{2})[^a-zA-Z0-9]?(\d{2})[^a-zA-Z0-9]?(\d{2})[^a-zA-Z0-9]?(\d{2})";

pub fn date_time_pattern() -> Regex {
    Regex::new(DATE_TIME_PATTERN).expect("date-time pattern is valid")
}

/// First date-time match in `text`, or `None` when nothing matches or the
/// matched components do not form a real calendar time.
pub fn parse_date_time(pattern: &Regex, text: &str) -> Option<NaiveDateTime> {
    let caps = pattern.captures(text)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)?;
    date.and_hms_opt(field(4)?, field(5)?, field(6)?)
}

/// Where a recording's capture timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimestampSource {
    Metadata,
    FileMtime,
}

impl TimestampSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::FileMtime => "file-mtime",
        }
    }
}

/// Resolved capture time. Values are local wall-clock; no timezone conversion
/// is performed anywhere, whichever metadata group they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureInstant {
    pub at: NaiveDateTime,
    pub source: TimestampSource,
}

/// Filesystem modification time of `path` as local wall-clock.
pub fn from_file_mtime(path: &Path) -> Result<NaiveDateTime> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("failed to read modification time of {}", path.display()))?;
    Ok(DateTime::<Local>::from(modified).naive_local())
}

/// Set the filesystem modification time of `path` to `at`.
pub fn apply_mtime(path: &Path, at: NaiveDateTime) -> Result<()> {
    let local = match Local.from_local_datetime(&at) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => {
            anyhow::bail!("{at} does not exist as a local wall-clock time");
        }
    };
    let file = fs::File::options()
        .write(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.set_modified(SystemTime::from(local))
        .with_context(|| format!("failed to set modification time of {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{date_time_pattern, parse_date_time};
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_colon_separated_tag_text() {
        let pattern = date_time_pattern();
        let dt = parse_date_time(&pattern, "2014:06:01 10:15:30").expect("parse");
        assert_eq!(
            (
                dt.year(),
                dt.month(),
                dt.day(),
                dt.hour(),
                dt.minute(),
                dt.second()
            ),
            (2014, 6, 1, 10, 15, 30)
        );
    }

    #[test]
    fn separators_are_arbitrary_or_absent() {
        let pattern = date_time_pattern();
        assert!(parse_date_time(&pattern, "20140601103045").is_some());
        assert!(parse_date_time(&pattern, "2014-06-01T10:30:45").is_some());
        assert!(parse_date_time(&pattern, "2014.06.01_10.30.45").is_some());
    }

    #[test]
    fn first_match_in_surrounding_text_wins() {
        let pattern = date_time_pattern();
        let dt = parse_date_time(&pattern, "created 2014:06:01 10:15:30 (dst)").expect("parse");
        assert_eq!(dt.year(), 2014);
    }

    #[test]
    fn impossible_dates_yield_none() {
        let pattern = date_time_pattern();
        assert!(parse_date_time(&pattern, "2014:13:01 10:15:30").is_none());
        assert!(parse_date_time(&pattern, "2014:06:01 25:15:30").is_none());
    }

    #[test]
    fn garbage_yields_none() {
        let pattern = date_time_pattern();
        assert!(parse_date_time(&pattern, "").is_none());
        assert!(parse_date_time(&pattern, "no digits here").is_none());
        assert!(parse_date_time(&pattern, "1234").is_none());
    }
}
