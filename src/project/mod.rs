//! In-memory project tree
//!
//! A scan turns a directory on disk into a [`DirectoryEntry`] holding only the
//! files that passed the scan rules. Children are ordered by name, and a
//! directory exists in the tree only on the way to at least one file.

pub mod rules;
pub mod scanner;
pub mod summary;

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use rules::ScanRules;
pub use scanner::{ProjectSnapshot, ScanError, Scanner};

/// One included file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    extension: String,
    content: String,
    path: PathBuf,
}

impl FileEntry {
    pub fn new(path: PathBuf, extension: String, content: String) -> Self {
        Self {
            extension,
            content,
            path,
        }
    }

    /// Lower-cased, with the leading dot
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

/// A child of a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    File(FileEntry),
    Directory(DirectoryEntry),
}

/// Directory listing keyed by child name, in byte-wise name order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    entries: BTreeMap<String, Node>,
}

impl DirectoryEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Follow `a/b/c` style components down the tree
    pub fn lookup<'a, I>(&self, components: I) -> Option<&Node>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut components = components.into_iter();
        let mut node = self.get(components.next()?)?;
        for name in components {
            match node {
                Node::Directory(dir) => node = dir.entries.get(name)?,
                Node::File(_) => return None,
            }
        }
        Some(node)
    }

    /// Insert a file below the directories named by `parents`, creating them
    /// as needed. Returns false when a file already occupies one of the
    /// parent names.
    pub(crate) fn insert_file(&mut self, parents: &[String], name: String, file: FileEntry) -> bool {
        let mut dir = self;
        for parent in parents {
            let node = dir
                .entries
                .entry(parent.clone())
                .or_insert_with(|| Node::Directory(DirectoryEntry::new()));
            match node {
                Node::Directory(child) => dir = child,
                Node::File(_) => return false,
            }
        }
        dir.entries.insert(name, Node::File(file));
        true
    }

    pub fn file_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                Node::File(_) => 1,
                Node::Directory(dir) => dir.file_count(),
            })
            .sum()
    }

    pub fn directory_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                Node::File(_) => 0,
                Node::Directory(dir) => 1 + dir.directory_count(),
            })
            .sum()
    }

    pub fn total_lines(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                Node::File(file) => file.line_count(),
                Node::Directory(dir) => dir.total_lines(),
            })
            .sum()
    }
}

#[cfg(test)]
impl DirectoryEntry {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
