//! Inclusion rules shared by the scanner and the summarizer

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::collections::BTreeSet;
use std::path::Path;

use super::ScanError;
use crate::config::ScanConfig;

/// Compiled allow-list and deny-lists
#[derive(Debug, Clone)]
pub struct ScanRules {
    extensions: BTreeSet<String>,
    excluded_dirs: BTreeSet<String>,
    file_patterns: Gitignore,
    pub max_depth: usize,
    pub max_file_size: u64,
    pub respect_gitignore: bool,
}

impl ScanRules {
    /// Compile `config`; a deny-pattern that is not a valid glob is
    /// [`ScanError::InvalidPattern`].
    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        let mut builder = GitignoreBuilder::new("");
        builder.case_insensitive(true)?;
        for pattern in &config.excluded_file_patterns {
            builder.add_line(None, pattern)?;
        }

        Ok(Self {
            extensions: config.extensions.iter().map(|e| e.to_lowercase()).collect(),
            excluded_dirs: config.excluded_directories.iter().cloned().collect(),
            file_patterns: builder.build()?,
            max_depth: config.max_depth.max(1),
            max_file_size: config.max_file_size_kb.saturating_mul(1024),
            respect_gitignore: config.respect_gitignore,
        })
    }

    /// Exact name match against the directory deny-list
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.contains(name)
    }

    /// Case-insensitive match against the filename deny-patterns
    pub fn is_excluded_file(&self, name: &str) -> bool {
        self.file_patterns.matched(Path::new(name), false).is_ignore()
    }

    /// `ext` must already carry the leading dot
    pub fn supports_extension(&self, ext: &str) -> bool {
        self.extensions.contains(&ext.to_lowercase())
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

#[cfg(test)]
impl ScanRules {
    pub fn defaults() -> Self {
        Self::from_config(&ScanConfig::default()).unwrap()
    }
}

/// Lower-cased extension of a file name, with the leading dot.
///
/// Names like `.gitignore` have no extension.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}
