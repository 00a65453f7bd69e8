//! Writing proposed file edits into the project

use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::FileEdit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStatus {
    Created,
    Updated,
    /// Existing content matches once surrounding whitespace is trimmed
    Unchanged,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub path: String,
    pub status: EditStatus,
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            EditStatus::Created => write!(f, "Created: {}", self.path),
            EditStatus::Updated => write!(f, "Updated: {}", self.path),
            EditStatus::Unchanged => write!(f, "Skipped (no changes): {}", self.path),
            EditStatus::Failed(reason) => write!(f, "Failed: {} ({})", self.path, reason),
        }
    }
}

#[derive(Debug, Error)]
enum ApplyError {
    #[error("empty path")]
    EmptyPath,

    #[error("absolute paths are not allowed")]
    AbsolutePath,

    #[error("path escapes the project root")]
    EscapesRoot,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Apply every edit below `root`. A failing edit is recorded and the rest
/// still run.
pub fn apply_file_edits(root: &Path, edits: &[FileEdit]) -> Vec<EditOutcome> {
    edits
        .iter()
        .map(|edit| {
            let status = match apply_one(root, edit) {
                Ok(status) => status,
                Err(err) => {
                    warn!("Could not apply edit to {}: {}", edit.path, err);
                    EditStatus::Failed(err.to_string())
                }
            };
            EditOutcome {
                path: edit.path.clone(),
                status,
            }
        })
        .collect()
}

fn apply_one(root: &Path, edit: &FileEdit) -> Result<EditStatus, ApplyError> {
    let target = resolve_under(root, &edit.path)?;
    ensure_inside(root, &target)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let status = if target.exists() {
        let existing = fs::read_to_string(&target)?;
        if existing.trim() == edit.content.trim() {
            return Ok(EditStatus::Unchanged);
        }
        EditStatus::Updated
    } else {
        EditStatus::Created
    };

    fs::write(&target, &edit.content)?;
    info!("{:?}: {}", status, target.display());
    Ok(status)
}

/// Join a relative path onto `root` without letting it climb out
fn resolve_under(root: &Path, relative: &str) -> Result<PathBuf, ApplyError> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(ApplyError::EscapesRoot);
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(ApplyError::AbsolutePath),
        }
    }

    if parts.is_empty() {
        return Err(ApplyError::EmptyPath);
    }

    Ok(parts.into_iter().fold(root.to_path_buf(), |path, part| path.join(part)))
}

/// Follow symlinks on the way to `target` and require the result to stay
/// under `root`. The deepest existing ancestor decides, since nothing below
/// it exists yet.
fn ensure_inside(root: &Path, target: &Path) -> Result<(), ApplyError> {
    let root = root.canonicalize()?;

    for ancestor in target.ancestors() {
        if fs::symlink_metadata(ancestor).is_err() {
            continue;
        }
        // A dangling link cannot be resolved, and writing through it could
        // land anywhere.
        let resolved = ancestor.canonicalize().map_err(|_| ApplyError::EscapesRoot)?;
        if resolved.starts_with(&root) {
            return Ok(());
        }
        return Err(ApplyError::EscapesRoot);
    }

    Err(ApplyError::EscapesRoot)
}
