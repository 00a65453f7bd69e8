//! CLI command implementations

pub mod analyze;
pub mod ask;
pub mod chat;
pub mod context;
pub mod info;
mod output;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::ai::ContextBuilder;
use crate::config::Config;
use crate::project::{ScanRules, Scanner};
use crate::session::{CurrentFile, Session};

/// Fresh session configured from `config`
pub(crate) fn build_session(config: &Config) -> Result<Session> {
    let rules = ScanRules::from_config(&config.scan).context("Invalid scan configuration")?;
    Ok(Session::new(
        Scanner::new(rules),
        ContextBuilder::new(config.summary.max_chars),
    ))
}

pub(crate) fn project_root(path: Option<&str>) -> PathBuf {
    PathBuf::from(path.unwrap_or("."))
}

/// The current file, preferring the scanned copy over a fresh read
pub(crate) fn load_current_file(session: &Session, path: &str) -> Result<CurrentFile> {
    let path = Path::new(path)
        .canonicalize()
        .with_context(|| format!("Cannot open current file {}", path))?;

    if let Some(file) = session.tracked_file(&path) {
        return Ok(file);
    }

    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(CurrentFile {
        path,
        content: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
