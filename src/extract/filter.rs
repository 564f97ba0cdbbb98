//! Extension and pattern filtering for extracted links.

use regex::Regex;
use url::Url;

use super::ExtractError;

/// File extensions accepted in `--all` mode: document, archive, and
/// media types commonly offered as page attachments.
pub const KNOWN_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "xlsm", "ppt", "pptx", "csv", "txt", "zip", "rar", "7z",
    "tar", "gz", "jpg", "jpeg", "png", "gif", "svg", "mp3", "mp4", "wav", "avi", "mov",
];

/// Which links count as downloadable files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterMode {
    /// Accept only paths whose extension exactly matches one of these
    /// entries (lowercase, dot-prefixed, e.g. `".pdf"`).
    Extensions(Vec<String>),
    /// Accept any path ending in one of [`KNOWN_EXTENSIONS`].
    AllKnown,
}

impl FilterMode {
    /// Parses a comma-separated extension list (`"pdf, .XLSX,xls"`) into
    /// normalized lowercase dot-prefixed entries. Empty entries are skipped.
    #[must_use]
    pub fn from_extension_list(list: &str) -> Self {
        let extensions = list
            .split(',')
            .filter_map(|entry| {
                let ext = entry.trim().trim_start_matches('.');
                (!ext.is_empty()).then(|| format!(".{}", ext.to_lowercase()))
            })
            .collect();
        Self::Extensions(extensions)
    }
}

/// Filtering configuration for one extraction run.
///
/// The include pattern is compiled at construction so an invalid pattern
/// fails before the page fetch is attempted.
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    mode: FilterMode,
    include: Option<Regex>,
}

impl FilterCriteria {
    /// Builds criteria from a mode and an optional include pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidPattern`] if the pattern does not
    /// compile.
    pub fn new(mode: FilterMode, include_pattern: Option<&str>) -> Result<Self, ExtractError> {
        let include = include_pattern
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ExtractError::invalid_pattern(pattern, e))
            })
            .transpose()?;
        Ok(Self { mode, include })
    }

    /// Returns true when the resolved URL survives extension and pattern
    /// filtering.
    #[must_use]
    pub fn accepts(&self, url: &Url) -> bool {
        let extension_ok = match &self.mode {
            FilterMode::AllKnown => has_known_extension(url.path()),
            FilterMode::Extensions(extensions) => path_extension(url)
                .is_some_and(|ext| extensions.iter().any(|allowed| *allowed == ext)),
        };
        if !extension_ok {
            return false;
        }

        self.include
            .as_ref()
            .is_none_or(|pattern| pattern.is_match(url.as_str()))
    }
}

/// Returns the lowercase dot-prefixed extension of the URL's path, if any.
#[must_use]
pub(crate) fn path_extension(url: &Url) -> Option<String> {
    let last_segment = url.path_segments()?.next_back()?;
    let dot_index = last_segment.rfind('.')?;
    let ext = &last_segment[dot_index..];
    if ext.len() <= 1 {
        return None;
    }
    Some(ext.to_lowercase())
}

fn has_known_extension(path: &str) -> bool {
    let lower = path.to_lowercase();
    KNOWN_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}
