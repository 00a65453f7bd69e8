//! Project tree scanner
//!
//! Walks a project root depth-first, in file name order, and collects every
//! file that passes the [`ScanRules`] into a [`DirectoryEntry`] tree.
//! Unreadable directories and files are logged and left out; only an
//! inaccessible root fails the scan.

use ignore::gitignore::Gitignore;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use super::rules::{extension_of, ScanRules};
use super::{DirectoryEntry, FileEntry};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot scan {}: {source}", path.display())]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid exclusion pattern: {0}")]
    InvalidPattern(#[from] ignore::Error),
}

/// Counters reported after a scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub files_included: usize,
    pub files_skipped: usize,
    pub unreadable: usize,
    pub elapsed_ms: u64,
}

/// Result of one scan: the tree plus where it came from
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSnapshot {
    pub root: PathBuf,
    pub tree: DirectoryEntry,
    pub stats: ScanStats,
}

#[derive(Debug, Clone)]
pub struct Scanner {
    rules: ScanRules,
}

impl Scanner {
    pub fn new(rules: ScanRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScanRules {
        &self.rules
    }

    /// Scan `root` into a fresh snapshot
    pub fn scan(&self, root: &Path) -> Result<ProjectSnapshot, ScanError> {
        let start = Instant::now();
        let root = open_root(root)?;

        let gitignore = if self.rules.respect_gitignore {
            load_gitignore(&root)
        } else {
            Gitignore::empty()
        };

        let mut tree = DirectoryEntry::new();
        let mut stats = ScanStats::default();

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .max_depth(self.rules.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.keep_entry(entry, &gitignore));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable path: {}", err);
                    stats.unreadable += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            match self.read_file(&entry) {
                Ok(Some(file)) => {
                    let Some((parents, name)) = split_relative(&root, entry.path()) else {
                        continue;
                    };
                    if tree.insert_file(&parents, name, file) {
                        stats.files_included += 1;
                    }
                }
                Ok(None) => stats.files_skipped += 1,
                Err(err) => {
                    warn!("Skipping unreadable file {}: {}", entry.path().display(), err);
                    stats.unreadable += 1;
                }
            }
        }

        stats.elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            "Scanned {}: {} files included, {} skipped, {} unreadable",
            root.display(),
            stats.files_included,
            stats.files_skipped,
            stats.unreadable
        );

        Ok(ProjectSnapshot { root, tree, stats })
    }

    /// Decides whether the walk enters or yields an entry
    fn keep_entry(&self, entry: &DirEntry, gitignore: &Gitignore) -> bool {
        // The root is scanned whatever its name is.
        if entry.depth() == 0 {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        if self.rules.is_excluded_dir(&name) {
            debug!("Excluded: {}", entry.path().display());
            return false;
        }

        if gitignore.matched(entry.path(), entry.file_type().is_dir()).is_ignore() {
            debug!("Ignored by .gitignore: {}", entry.path().display());
            return false;
        }

        true
    }

    /// `Ok(None)` when the file is filtered out
    fn read_file(&self, entry: &DirEntry) -> io::Result<Option<FileEntry>> {
        let name = entry.file_name().to_string_lossy();

        if self.rules.is_excluded_file(&name) {
            debug!("Excluded by pattern: {}", entry.path().display());
            return Ok(None);
        }

        let Some(extension) = extension_of(&name) else {
            return Ok(None);
        };
        if !self.rules.supports_extension(&extension) {
            return Ok(None);
        }

        let size = entry.metadata().map_err(io::Error::from)?.len();
        if self.rules.max_file_size > 0 && size > self.rules.max_file_size {
            debug!("Too large ({} bytes): {}", size, entry.path().display());
            return Ok(None);
        }

        let bytes = fs::read(entry.path())?;
        let content = String::from_utf8_lossy(&bytes).into_owned();

        Ok(Some(FileEntry::new(entry.path().to_path_buf(), extension, content)))
    }
}

fn open_root(root: &Path) -> Result<PathBuf, ScanError> {
    let inaccessible = |source| ScanError::RootInaccessible {
        path: root.to_path_buf(),
        source,
    };

    let canonical = root.canonicalize().map_err(inaccessible)?;
    if !canonical.is_dir() {
        return Err(inaccessible(io::Error::other("not a directory")));
    }
    fs::read_dir(&canonical).map_err(inaccessible)?;

    Ok(canonical)
}

fn load_gitignore(root: &Path) -> Gitignore {
    let path = root.join(".gitignore");
    if !path.exists() {
        return Gitignore::empty();
    }

    let (gitignore, err) = Gitignore::new(&path);
    if let Some(err) = err {
        warn!("Problem reading {}: {}", path.display(), err);
    }
    gitignore
}

/// Parent directory names and file name of `path` relative to `root`
fn split_relative(root: &Path, path: &Path) -> Option<(Vec<String>, String)> {
    let relative = path.strip_prefix(root).ok()?;
    let mut components: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let name = components.pop()?;
    Some((components, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use crate::project::Node;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn scanner() -> Scanner {
        Scanner::new(ScanRules::defaults())
    }

    fn scanner_with(config: ScanConfig) -> Scanner {
        Scanner::new(ScanRules::from_config(&config).unwrap())
    }

    fn assert_no_empty_dirs(dir: &DirectoryEntry) {
        assert!(!dir.is_empty());
        for (_, node) in dir.iter() {
            if let Node::Directory(child) = node {
                assert_no_empty_dirs(child);
            }
        }
    }

    #[test]
    fn test_scan_example_project() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/index.ts", "export const x = 1;");
        write(temp.path(), "node_modules/pkg/index.js", "module.exports = {};");
        write(temp.path(), "README.md", "# Hello");
        write(temp.path(), ".git/config", "[core]");

        let snapshot = scanner().scan(temp.path()).unwrap();

        assert_eq!(snapshot.tree.names().collect::<Vec<_>>(), vec!["README.md", "src"]);
        match snapshot.tree.get("src") {
            Some(Node::Directory(src)) => {
                assert_eq!(src.names().collect::<Vec<_>>(), vec!["index.ts"]);
                match src.get("index.ts") {
                    Some(Node::File(file)) => {
                        assert_eq!(file.extension(), ".ts");
                        assert_eq!(file.content(), "export const x = 1;");
                        assert!(file.path().is_absolute());
                    }
                    other => panic!("expected file, got {:?}", other),
                }
            }
            other => panic!("expected directory, got {:?}", other),
        }
        assert_eq!(snapshot.stats.files_included, 2);
    }

    #[test]
    fn test_directories_without_surviving_files_are_pruned() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "assets/logo.png", "png");
        write(temp.path(), "deep/er/still/notes.txt", "text");
        write(temp.path(), "src/lib/util.py", "def f(): pass");
        fs::create_dir_all(temp.path().join("empty/nested")).unwrap();

        let snapshot = scanner().scan(temp.path()).unwrap();

        assert_eq!(snapshot.tree.names().collect::<Vec<_>>(), vec!["src"]);
        assert_no_empty_dirs(&snapshot.tree);
    }

    #[test]
    fn test_empty_root_gives_empty_tree() {
        let temp = TempDir::new().unwrap();
        let snapshot = scanner().scan(temp.path()).unwrap();
        assert!(snapshot.tree.is_empty());
    }

    #[test]
    fn test_deny_listed_directories_are_skipped_at_any_depth() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "web/dist/bundle.js", "x");
        write(temp.path(), "web/coverage/report.html", "x");
        write(temp.path(), "web/app.js", "x");
        write(temp.path(), ".github/workflows/ci.json", "{}");

        let snapshot = scanner().scan(temp.path()).unwrap();

        match snapshot.tree.get("web") {
            Some(Node::Directory(web)) => {
                assert_eq!(web.names().collect::<Vec<_>>(), vec!["app.js"]);
            }
            other => panic!("expected directory, got {:?}", other),
        }
        assert!(snapshot.tree.get(".github").is_none());
    }

    #[test]
    fn test_unsupported_extensions_and_patterns_are_skipped() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "main.rs", "fn main() {}");
        write(temp.path(), "Makefile", "all:");
        write(temp.path(), ".env.settings.json", "{}");
        write(temp.path(), "settings.json", "{}");
        write(temp.path(), "NOTES.MD", "# notes");

        let snapshot = scanner().scan(temp.path()).unwrap();

        assert_eq!(
            snapshot.tree.names().collect::<Vec<_>>(),
            vec!["NOTES.MD", "settings.json"]
        );
        match snapshot.tree.get("NOTES.MD") {
            Some(Node::File(file)) => assert_eq!(file.extension(), ".md"),
            other => panic!("expected file, got {:?}", other),
        }
        assert_eq!(snapshot.stats.files_skipped, 3);
    }

    #[test]
    fn test_root_is_scanned_even_if_deny_listed_name() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "build/index.ts", "export {}");

        let snapshot = scanner().scan(&temp.path().join("build")).unwrap();

        assert_eq!(snapshot.tree.names().collect::<Vec<_>>(), vec!["index.ts"]);
    }

    #[test]
    fn test_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let err = scanner().scan(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, ScanError::RootInaccessible { .. }));
    }

    #[test]
    fn test_file_root_fails() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.ts", "");
        let err = scanner().scan(&temp.path().join("a.ts")).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_rescan_is_identical() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b/z.ts", "z");
        write(temp.path(), "b/a.ts", "a");
        write(temp.path(), "a.md", "m");

        let first = scanner().scan(temp.path()).unwrap();
        let second = scanner().scan(temp.path()).unwrap();

        assert_eq!(first.tree, second.tree);
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bad.js"), [b'o', b'k', 0xff, b'!']).unwrap();

        let snapshot = scanner().scan(temp.path()).unwrap();

        match snapshot.tree.get("bad.js") {
            Some(Node::File(file)) => assert_eq!(file.content(), "ok\u{FFFD}!"),
            other => panic!("expected file, got {:?}", other),
        }
    }

    #[test]
    fn test_large_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "big.json", &"x".repeat(2048));
        write(temp.path(), "small.json", "{}");

        let snapshot = scanner_with(ScanConfig {
            max_file_size_kb: 1,
            ..ScanConfig::default()
        })
        .scan(temp.path())
        .unwrap();

        assert_eq!(snapshot.tree.names().collect::<Vec<_>>(), vec!["small.json"]);
    }

    #[test]
    fn test_max_depth_bounds_the_walk() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "top.ts", "");
        write(temp.path(), "a/b/c/deep.ts", "");

        let snapshot = scanner_with(ScanConfig {
            max_depth: 2,
            ..ScanConfig::default()
        })
        .scan(temp.path())
        .unwrap();

        assert_eq!(snapshot.tree.names().collect::<Vec<_>>(), vec!["top.ts"]);
    }

    #[test]
    fn test_gitignore_is_respected_when_enabled() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".gitignore", "generated/\nsecret.ts\n");
        write(temp.path(), "generated/api.ts", "");
        write(temp.path(), "secret.ts", "");
        write(temp.path(), "kept.ts", "");

        let plain = scanner().scan(temp.path()).unwrap();
        assert_eq!(plain.tree.file_count(), 3);

        let filtered = scanner_with(ScanConfig {
            respect_gitignore: true,
            ..ScanConfig::default()
        })
        .scan(temp.path())
        .unwrap();
        assert_eq!(filtered.tree.names().collect::<Vec<_>>(), vec!["kept.ts"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_paths_are_left_out() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/index.ts", "export {}");
        write(temp.path(), "src/locked.ts", "export const hidden = 1;");
        write(temp.path(), "private/notes.md", "# private");
        write(temp.path(), "README.md", "# Hello");

        let locked_file = temp.path().join("src/locked.ts");
        let locked_dir = temp.path().join("private");
        fs::set_permissions(&locked_file, fs::Permissions::from_mode(0o000)).unwrap();
        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind a privileged user
        let privileged = fs::read(&locked_file).is_ok();

        let result = scanner().scan(temp.path());

        fs::set_permissions(&locked_file, fs::Permissions::from_mode(0o644)).unwrap();
        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();

        if privileged {
            return;
        }

        let snapshot = result.unwrap();
        assert_eq!(snapshot.tree.names().collect::<Vec<_>>(), vec!["README.md", "src"]);
        match snapshot.tree.get("src") {
            Some(Node::Directory(src)) => assert_eq!(src.names().collect::<Vec<_>>(), vec!["index.ts"]),
            other => panic!("expected src directory, got {:?}", other),
        }
        assert_eq!(snapshot.stats.files_included, 2);
        assert!(snapshot.stats.unreadable >= 2);
        assert_no_empty_dirs(&snapshot.tree);
    }
}
