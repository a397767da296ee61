use crate::import::timestamp::{date_time_pattern, parse_date_time};
use crate::tools::exiftool::{self, ProbedTag};
use chrono::NaiveDateTime;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Immutable probe configuration: ordered date tag candidates, the tag groups
/// that report UTC, and the date-time pattern. Injected at construction so
/// tests can substitute their own catalogue.
#[derive(Debug, Clone)]
pub struct ProbeCatalogue {
    pub date_tags: Vec<String>,
    pub utc_groups: Vec<String>,
    pub pattern: Regex,
}

impl Default for ProbeCatalogue {
    fn default() -> Self {
        Self {
            // original-capture, digitized-capture, last-modify, in that order
            date_tags: vec![
                "DateTimeOriginal".to_string(),
                "CreateDate".to_string(),
                "ModifyDate".to_string(),
            ],
            utc_groups: vec!["quicktime".to_string()],
            pattern: date_time_pattern(),
        }
    }
}

impl ProbeCatalogue {
    pub fn is_utc_group(&self, group: &str) -> bool {
        self.utc_groups
            .iter()
            .any(|g| g.eq_ignore_ascii_case(group))
    }
}

pub struct MetadataProbe {
    catalogue: ProbeCatalogue,
    exiftool_bin: PathBuf,
}

impl MetadataProbe {
    pub fn new(catalogue: ProbeCatalogue, exiftool_bin: PathBuf) -> Self {
        Self {
            catalogue,
            exiftool_bin,
        }
    }

    /// Capture time of `path` from the first tag candidate that yields a
    /// non-empty value, or `None` when every candidate is absent or the value
    /// does not parse. Individual tag query failures never abort the probe.
    pub fn resolve_capture_time(&self, path: &Path) -> Option<NaiveDateTime> {
        let tag = self.first_tag_value(path)?;
        if self.catalogue.is_utc_group(&tag.group) {
            // the group reports UTC, but values are kept as local wall-clock
            debug!(
                group = %tag.group,
                "tag group reports UTC; value treated as local time"
            );
        }
        parse_date_time(&self.catalogue.pattern, &tag.value)
    }

    fn first_tag_value(&self, path: &Path) -> Option<ProbedTag> {
        for tag_name in &self.catalogue.date_tags {
            match exiftool::read_tag(&self.exiftool_bin, tag_name, path) {
                Ok(Some(tag)) if !tag.value.trim().is_empty() => {
                    debug!(tag = %tag_name, value = %tag.value, "date tag resolved");
                    return Some(tag);
                }
                Ok(_) => {
                    debug!(tag = %tag_name, "date tag absent");
                }
                Err(err) => {
                    debug!(tag = %tag_name, error = %format!("{err:#}"), "date tag query failed");
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::ProbeCatalogue;

    #[test]
    fn default_catalogue_prefers_original_capture() {
        let cat = ProbeCatalogue::default();
        assert_eq!(
            cat.date_tags,
            vec!["DateTimeOriginal", "CreateDate", "ModifyDate"]
        );
    }

    #[test]
    fn utc_group_detection_ignores_case() {
        let cat = ProbeCatalogue::default();
        assert!(cat.is_utc_group("QuickTime"));
        assert!(cat.is_utc_group("quicktime"));
        assert!(!cat.is_utc_group("exif"));
    }
}
